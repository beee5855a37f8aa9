use crate::catalog::SEASONAL_CATEGORIES;
use crate::item::ItemId;

/// A navigable location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Home,
    Category(String),
    Item(ItemId),
}

impl Route {
    /// Parses `/`, `/category/{name}` or `/item/{id}`. Unknown paths go home.
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim().trim_end_matches('/');
        if let Some(name) = trimmed.strip_prefix("/category/") {
            if !name.is_empty() {
                return Route::Category(name.to_string());
            }
        }
        if let Some(id) = trimmed.strip_prefix("/item/") {
            if !id.is_empty() && !id.contains('/') {
                return Route::Item(id.to_string());
            }
        }
        Route::Home
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Category(name) => format!("/category/{}", name),
            Route::Item(id) => format!("/item/{}", id),
        }
    }

    pub fn is_seasonal(&self) -> bool {
        let path = self.path();
        SEASONAL_CATEGORIES.iter().any(|s| path.contains(s))
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_paths() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(
            Route::parse("/category/Coffee & Tea"),
            Route::Category("Coffee & Tea".to_string())
        );
        assert_eq!(Route::parse("/item/abc123/"), Route::Item("abc123".to_string()));
        assert_eq!(Route::parse("/item/"), Route::Home);
        assert_eq!(Route::parse("/elsewhere"), Route::Home);
    }

    #[test]
    fn path_round_trip() {
        let route = Route::Category("Wines".to_string());
        assert_eq!(Route::parse(&route.path()), route);
        assert_eq!(Route::Home.to_string(), "/");
    }

    #[test]
    fn seasonal_routes() {
        assert!(Route::Category("Valentine".to_string()).is_seasonal());
        assert!(!Route::Category("Wines".to_string()).is_seasonal());
        assert!(!Route::Home.is_seasonal());
    }
}
