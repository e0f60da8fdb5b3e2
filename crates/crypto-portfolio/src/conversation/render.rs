//! Reply rendering

use bot_core::Reply;

use super::action::Action;
use crate::model::{ProfileRegistry, Portfolio, Valuation};

const HELP_TEXT: &str = "Bot usage guide:\n\n\
1. Select profile: choose the active portfolio profile\n\
2. View portfolio: show your assets and their current USD value\n\
3. Add an asset: add a new asset (or replace one) in the portfolio\n\
4. Remove an asset: delete an asset from the portfolio\n\
5. Update asset amount: change the amount of an asset you already hold\n\
6. Manage profiles: add or delete profiles\n\
7. Help: show this message\n\n\
Use the buttons of the main menu to navigate.";

fn button(reply: Reply, label: &str, action: &Action) -> Reply {
    reply.with_choice(label, action.token())
}

pub fn main_menu(active_profile: Option<&str>) -> Reply {
    let mut text = String::from("Welcome to your personal Crypto Portfolio Bot!\n");
    if let Some(profile) = active_profile {
        text.push_str(&format!("Active profile: {profile}\n"));
    }
    text.push_str("Please select an option below:");

    [
        ("Select profile", Action::ChooseProfile),
        ("View portfolio", Action::ViewPortfolio),
        ("Add an asset", Action::AddAsset),
        ("Remove an asset", Action::RemoveAsset),
        ("Update asset amount", Action::UpdateAsset),
        ("Manage profiles", Action::ManageProfiles),
        ("Help", Action::Help),
    ]
    .iter()
    .fold(Reply::text(text), |reply, (label, action)| button(reply, label, action))
}

pub fn help() -> Reply {
    button(Reply::text(HELP_TEXT), "Back to the main menu", &Action::MainMenu)
}

pub fn manage_profiles() -> Reply {
    let reply = button(Reply::text("Manage profiles:"), "Add profile", &Action::AddProfile);
    let reply = button(reply, "Delete profile", &Action::RemoveProfile);
    button(reply, "Back", &Action::MainMenu)
}

pub fn select_profile_first() -> Reply {
    let reply = button(
        Reply::text("Please select a profile first."),
        "Select profile",
        &Action::ChooseProfile,
    );
    button(reply, "Back", &Action::MainMenu)
}

pub fn no_profiles() -> Reply {
    let reply = button(
        Reply::text("You don't have a profile yet. Please create a new profile first."),
        "Add profile",
        &Action::AddProfile,
    );
    button(reply, "Back", &Action::MainMenu)
}

pub fn profile_picker(text: &str, profiles: &ProfileRegistry, pick: fn(String) -> Action, back: &Action) -> Reply {
    let reply = profiles
        .names()
        .fold(Reply::text(text), |reply, name| {
            button(reply, name, &pick(name.to_string()))
        });
    button(reply, "Back", back)
}

pub fn asset_picker(text: &str, portfolio: &Portfolio, pick: fn(String) -> Action) -> Reply {
    let reply = portfolio
        .symbols()
        .fold(Reply::text(text), |reply, symbol| {
            button(reply, symbol, &pick(symbol.to_string()))
        });
    button(reply, "Back", &Action::MainMenu)
}

pub fn empty_portfolio(profile: &str) -> Reply {
    let reply = button(
        Reply::text(format!("Your portfolio for profile '{profile}' is empty.")),
        "Add an asset",
        &Action::AddAsset,
    );
    button(reply, "Back", &Action::MainMenu)
}

pub fn prompt(text: impl Into<String>, cancel_keyword: &str) -> Reply {
    Reply::text(format!("{}\n\nType '{cancel_keyword}' to cancel.", text.into()))
}

/// Priced portfolio listing:
///
/// ```text
/// Your portfolio (profile: main):
///
/// ETH: 1.5 ($3000.00)
/// XYZ: 10 (price unavailable)
///
/// Total portfolio value: $3000.00
///
/// Last updated: 2024-01-01 12:00:00 UTC
/// ```
pub fn valuation(valuation: &Valuation) -> Reply {
    let mut text = format!("Your portfolio (profile: {}):\n\n", valuation.profile);

    for line in &valuation.lines {
        let value = match line.value() {
            Some(value) => format!("${value:.2}"),
            None if line.overflows() => "value unavailable".to_string(),
            None => "price unavailable".to_string(),
        };
        text.push_str(&format!("{}: {} ({value})\n", line.symbol, line.amount));
    }

    match valuation.total_value() {
        Some(total) => text.push_str(&format!("\nTotal portfolio value: ${total:.2}")),
        None => text.push_str("\nTotal portfolio value: unavailable"),
    }
    text.push_str(&format!(
        "\n\nLast updated: {}",
        valuation.taken_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    let reply = button(Reply::text(text), "Refresh prices", &Action::RefreshPrices);
    let reply = button(reply, "Update asset amount", &Action::UpdateAsset);
    button(reply, "Back", &Action::MainMenu)
}
