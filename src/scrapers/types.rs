/// Endpoints and form names of the listing site
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Favorites landing page; also serves the login form when signed out
    pub favorites_url: String,
    /// `name` attribute of the login form
    pub login_form: String,
    /// Form field receiving the username
    pub email_field: String,
    /// Form field receiving the password
    pub password_field: String,
    /// Host used when building canonical listing URLs
    pub canonical_host: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            favorites_url: "https://www.zillow.com/myzillow/Favorites.htm".to_string(),
            login_form: "loginForm".to_string(),
            email_field: "emailAddr".to_string(),
            password_field: "password".to_string(),
            canonical_host: "www.zillow.com".to_string(),
        }
    }
}
