use failure;

use errors::Error;
use failure::Fail;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Admin,
    Owner,
}

impl Role {
    pub fn from_code(code: &str) -> Result<Self, failure::Error> {
        match code {
            "customer" => Ok(Role::Customer),
            "admin" => Ok(Role::Admin),
            "owner" => Ok(Role::Owner),
            other => Err(Error::Parse.context(format!("Unknown role {}", other)).into()),
        }
    }

    pub fn is_back_office(&self) -> bool {
        match *self {
            Role::Admin | Role::Owner => true,
            Role::Customer => false,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum RouteKind {
    Storefront,
    BackOffice,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum NavbarView {
    Guest,
    Customer,
    BackOffice,
}

/// Picks the navbar variant for the current session and route.
pub fn navbar_view(role: Option<Role>, route: RouteKind) -> NavbarView {
    match (route, role) {
        (RouteKind::BackOffice, Some(role)) if role.is_back_office() => NavbarView::BackOffice,
        (_, Some(_)) => NavbarView::Customer,
        (_, None) => NavbarView::Guest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navbar_dispatch() {
        assert_eq!(navbar_view(None, RouteKind::Storefront), NavbarView::Guest);
        assert_eq!(navbar_view(None, RouteKind::BackOffice), NavbarView::Guest);
        assert_eq!(
            navbar_view(Some(Role::Customer), RouteKind::Storefront),
            NavbarView::Customer
        );
        assert_eq!(
            navbar_view(Some(Role::Customer), RouteKind::BackOffice),
            NavbarView::Customer
        );
        assert_eq!(
            navbar_view(Some(Role::Admin), RouteKind::BackOffice),
            NavbarView::BackOffice
        );
        assert_eq!(
            navbar_view(Some(Role::Owner), RouteKind::BackOffice),
            NavbarView::BackOffice
        );
        assert_eq!(
            navbar_view(Some(Role::Admin), RouteKind::Storefront),
            NavbarView::Customer
        );
    }

    #[test]
    fn role_codes() {
        assert_eq!(Role::from_code("admin").unwrap(), Role::Admin);
        assert!(Role::from_code("superuser").is_err());
    }
}
