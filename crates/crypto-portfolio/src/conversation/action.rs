//! Button tokens and commands understood by the conversation machine

/// What a pressed button asks for. Tokens round-trip through `token()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    MainMenu,
    ChooseProfile,
    SetProfile(String),
    ViewPortfolio,
    RefreshPrices,
    AddAsset,
    RemoveAsset,
    PickRemoveAsset(String),
    UpdateAsset,
    PickUpdateAsset(String),
    ManageProfiles,
    AddProfile,
    RemoveProfile,
    ConfirmRemoveProfile(String),
    Help,
}

impl Action {
    pub fn parse(token: &str) -> Option<Self> {
        let action = match token {
            "start" => Self::MainMenu,
            "choose_profile" => Self::ChooseProfile,
            "view_portfolio" => Self::ViewPortfolio,
            "update_prices" => Self::RefreshPrices,
            "add_asset" => Self::AddAsset,
            "remove_asset" => Self::RemoveAsset,
            "update_asset" => Self::UpdateAsset,
            "manage_profiles" => Self::ManageProfiles,
            "add_profile" => Self::AddProfile,
            "remove_profile" => Self::RemoveProfile,
            "help" => Self::Help,
            _ => {
                let (kind, arg) = token.split_once(':')?;
                if arg.is_empty() {
                    return None;
                }
                let arg = arg.to_string();
                match kind {
                    "set_profile" => Self::SetProfile(arg),
                    "remove" => Self::PickRemoveAsset(arg),
                    "update" => Self::PickUpdateAsset(arg),
                    "confirm_remove" => Self::ConfirmRemoveProfile(arg),
                    _ => return None,
                }
            }
        };
        Some(action)
    }

    pub fn token(&self) -> String {
        match self {
            Self::MainMenu => "start".into(),
            Self::ChooseProfile => "choose_profile".into(),
            Self::SetProfile(name) => format!("set_profile:{name}"),
            Self::ViewPortfolio => "view_portfolio".into(),
            Self::RefreshPrices => "update_prices".into(),
            Self::AddAsset => "add_asset".into(),
            Self::RemoveAsset => "remove_asset".into(),
            Self::PickRemoveAsset(symbol) => format!("remove:{symbol}"),
            Self::UpdateAsset => "update_asset".into(),
            Self::PickUpdateAsset(symbol) => format!("update:{symbol}"),
            Self::ManageProfiles => "manage_profiles".into(),
            Self::AddProfile => "add_profile".into(),
            Self::RemoveProfile => "remove_profile".into(),
            Self::ConfirmRemoveProfile(name) => format!("confirm_remove:{name}"),
            Self::Help => "help".into(),
        }
    }
}

/// Slash commands
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Cancel,
    Unknown(String),
}

impl Command {
    pub fn parse(name: &str) -> Self {
        let name = name.trim().trim_start_matches('/');
        // Telegram-style "/start@SomeBot"
        let name = name.split('@').next().unwrap_or_default();
        match name.to_lowercase().as_str() {
            "start" | "menu" => Self::Start,
            "help" => Self::Help,
            "cancel" => Self::Cancel,
            _ => Self::Unknown(name.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let actions = [
            Action::MainMenu,
            Action::SetProfile("main".into()),
            Action::PickRemoveAsset("ETH".into()),
            Action::PickUpdateAsset("BTC".into()),
            Action::ConfirmRemoveProfile("old".into()),
            Action::RefreshPrices,
        ];
        for action in actions {
            assert_eq!(Action::parse(&action.token()), Some(action));
        }
    }

    #[test]
    fn test_argument_may_contain_separator() {
        assert_eq!(
            Action::parse("set_profile:long:term"),
            Some(Action::SetProfile("long:term".into()))
        );
    }

    #[test]
    fn test_unknown_tokens() {
        assert_eq!(Action::parse("launch_rocket"), None);
        assert_eq!(Action::parse("remove:"), None);
        assert_eq!(Action::parse("nuke:everything"), None);
    }

    #[test]
    fn test_commands() {
        assert_eq!(Command::parse("/start"), Command::Start);
        assert_eq!(Command::parse("menu"), Command::Start);
        assert_eq!(Command::parse("/help@PortfolioBot"), Command::Help);
        assert_eq!(Command::parse("/CANCEL"), Command::Cancel);
        assert_eq!(Command::parse("/foo"), Command::Unknown("foo".into()));
    }
}
