use crate::{
    models::{AccountMenu, NavItem, NavigationView},
    registry::{LOGIN_PATH, RoleRegistry},
    session::Session,
};

/// compose
///
/// Renders the sidebar for a session at `current_path`: the role's entries from the registry,
/// with the entry whose href equals the path exactly marked active. Sessions without a profile
/// get the default role's entries and a login link in place of the user menu.
pub fn compose(registry: &RoleRegistry, session: &Session, current_path: &str) -> NavigationView {
    let entries = registry
        .entries_for(session.role())
        .iter()
        .map(|entry| NavItem {
            title: entry.title.clone(),
            href: entry.href.clone(),
            icon: entry.icon.clone(),
            active: entry.href == current_path,
        })
        .collect();

    NavigationView {
        entries,
        account: account_menu(session),
    }
}

pub fn account_menu(session: &Session) -> AccountMenu {
    match session.profile() {
        Some(profile) => AccountMenu::User {
            display_name: profile.display_name().to_string(),
            email: profile.email.clone(),
            role: profile.role.clone(),
        },
        None => AccountMenu::Login {
            href: LOGIN_PATH.to_string(),
        },
    }
}
