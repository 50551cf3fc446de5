/// Access to `document.cookie`: `read` returns the whole cookie header string,
/// `write` assigns a single `name=value; attrs` cookie.
pub trait CookieStore {
    type Error: std::fmt::Display;

    fn read(&self) -> Result<String, Self::Error>;
    fn write(&self, cookie: &str) -> Result<(), Self::Error>;
}
