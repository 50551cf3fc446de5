use crate::logging::{LogEntry, Logger};
use crate::ports::CookieStore;

use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};
use time::OffsetDateTime;

const COOKIE_MAX_AGE_SECS: u32 = 31_536_000;

/// Returns the device identifier stored under `cookie_name`, creating and
/// persisting one on first use.
///
/// When the cookie cannot be read or written the failure is logged and a
/// fresh identifier is returned for this call only. Such identifiers are not
/// persisted, so repeated calls in that state yield different values.
pub fn get_or_create_device_id<C: CookieStore>(
    cookies: &C,
    cookie_name: &str,
    logger: &Logger,
) -> String {
    match read_or_persist(cookies, cookie_name) {
        Ok(device_id) => device_id,
        Err(err) => {
            logger.warn(
                LogEntry::new("Failed to get/set deviceId cookie, using session-only UUID")
                    .with("error", err),
            );
            generate_device_id()
        }
    }
}

fn read_or_persist<C: CookieStore>(cookies: &C, cookie_name: &str) -> Result<String, String> {
    let header = cookies.read().map_err(|err| err.to_string())?;
    if let Some(value) = find_cookie(&header, cookie_name) {
        return Ok(value.to_string());
    }

    let device_id = generate_device_id();
    cookies
        .write(&device_id_cookie(cookie_name, &device_id))
        .map_err(|err| err.to_string())?;
    Ok(device_id)
}

/// First `name=value` with a non-empty value where `name` sits at the start
/// of the header or right after a space.
fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    if name.is_empty() {
        return None;
    }
    let needle = format!("{name}=");
    header.match_indices(&needle).find_map(|(start, _)| {
        if start > 0 && header.as_bytes()[start - 1] != b' ' {
            return None;
        }
        let rest = &header[start + needle.len()..];
        let value = rest.split(';').next().unwrap_or_default();
        if value.is_empty() { None } else { Some(value) }
    })
}

fn device_id_cookie(name: &str, device_id: &str) -> String {
    format!("{name}={device_id}; path=/; max-age={COOKIE_MAX_AGE_SECS}; SameSite=Lax")
}

/// New random v4 UUID. Uses the OS random source and falls back to a
/// time-seeded generator when that source is unavailable.
pub fn generate_device_id() -> String {
    let mut rng = OsRng;
    generate_device_id_with_rng(&mut rng)
}

pub(crate) fn generate_device_id_with_rng<R: RngCore>(rng: &mut R) -> String {
    let mut bytes = [0u8; 16];
    if rng.try_fill_bytes(&mut bytes).is_err() {
        let seed = OffsetDateTime::now_utc().unix_timestamp_nanos() as u64;
        StdRng::seed_from_u64(seed).fill_bytes(&mut bytes);
    }
    format_uuid(bytes)
}

fn format_uuid(bytes: [u8; 16]) -> String {
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .hyphenated()
        .to_string()
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct TestCookies {
        jar: RefCell<String>,
        writes: RefCell<Vec<String>>,
        fail_read: bool,
        fail_write: bool,
    }

    impl TestCookies {
        fn with_header(header: &str) -> Self {
            Self {
                jar: RefCell::new(header.to_string()),
                ..Self::default()
            }
        }
    }

    impl CookieStore for TestCookies {
        type Error = &'static str;

        fn read(&self) -> Result<String, Self::Error> {
            if self.fail_read {
                return Err("cookie access denied");
            }
            Ok(self.jar.borrow().clone())
        }

        fn write(&self, cookie: &str) -> Result<(), Self::Error> {
            if self.fail_write {
                return Err("cookie access denied");
            }
            self.writes.borrow_mut().push(cookie.to_string());
            let pair = cookie.split(';').next().unwrap_or_default();
            let mut jar = self.jar.borrow_mut();
            if !jar.is_empty() {
                jar.push_str("; ");
            }
            jar.push_str(pair);
            Ok(())
        }
    }

    struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for value in dest.iter_mut() {
                *value = 0;
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    struct FailingRng;

    impl RngCore for FailingRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for value in dest.iter_mut() {
                *value = 0;
            }
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new("entropy source unavailable"))
        }
    }

    #[test]
    fn get_or_create_device_id__should_return_same_id_on_repeated_calls() {
        for name in ["webpushkit_deviceId", "custom", "a"] {
            // Given
            let cookies = TestCookies::default();
            let logger = Logger::new(false);

            // When
            let first = get_or_create_device_id(&cookies, name, &logger);
            let second = get_or_create_device_id(&cookies, name, &logger);

            // Then
            assert_eq!(first, second);
            assert_eq!(cookies.writes.borrow().len(), 1);
        }
    }

    #[test]
    fn get_or_create_device_id__should_reuse_existing_cookie() {
        // Given
        let cookies = TestCookies::with_header("theme=dark; webpushkit_deviceId=abc-123; other=1");

        // When
        let device_id = get_or_create_device_id(&cookies, "webpushkit_deviceId", &Logger::new(false));

        // Then
        assert_eq!(device_id, "abc-123");
        assert!(cookies.writes.borrow().is_empty());
    }

    #[test]
    fn get_or_create_device_id__should_write_site_wide_cookie_for_a_year() {
        // Given
        let cookies = TestCookies::default();

        // When
        let device_id = get_or_create_device_id(&cookies, "device", &Logger::new(false));

        // Then
        let writes = cookies.writes.borrow();
        assert_eq!(
            writes[0],
            format!("device={device_id}; path=/; max-age=31536000; SameSite=Lax")
        );
    }

    #[test]
    fn get_or_create_device_id__should_return_unpersisted_ids_when_cookies_fail() {
        // Given
        let cookies = TestCookies {
            fail_read: true,
            ..TestCookies::default()
        };
        let logger = Logger::new(false);

        // When
        let first = get_or_create_device_id(&cookies, "device", &logger);
        let second = get_or_create_device_id(&cookies, "device", &logger);

        // Then
        assert_ne!(first, second);
        assert!(cookies.writes.borrow().is_empty());
        assert!(uuid::Uuid::parse_str(&first).is_ok());
    }

    #[test]
    fn get_or_create_device_id__should_degrade_when_write_fails() {
        // Given
        let cookies = TestCookies {
            fail_write: true,
            ..TestCookies::default()
        };

        // When
        let device_id = get_or_create_device_id(&cookies, "device", &Logger::new(false));

        // Then
        assert!(uuid::Uuid::parse_str(&device_id).is_ok());
        assert!(cookies.jar.borrow().is_empty());
    }

    #[test]
    fn find_cookie__should_match_exact_name_only() {
        assert_eq!(find_cookie("xdevice=1; device=2", "device"), Some("2"));
        assert_eq!(find_cookie("device=", "device"), None);
        assert_eq!(find_cookie("", "device"), None);
    }

    #[test]
    fn find_cookie__should_require_start_or_space_before_name() {
        assert_eq!(find_cookie("device=5", "device"), Some("5"));
        assert_eq!(find_cookie("a=1;device=2", "device"), None);
        assert_eq!(find_cookie("a=1;  device=3", "device"), Some("3"));
        assert_eq!(find_cookie("device=; other=1; device=4", "device"), Some("4"));
    }

    #[test]
    fn generate_device_id_with_rng__should_force_version_and_variant_bits() {
        // Given
        let mut rng = ZeroRng;

        // When
        let device_id = generate_device_id_with_rng(&mut rng);

        // Then
        assert_eq!(device_id, "00000000-0000-4000-8000-000000000000");
    }

    #[test]
    fn generate_device_id_with_rng__should_fall_back_when_source_fails() {
        // Given
        let mut rng = FailingRng;

        // When
        let device_id = generate_device_id_with_rng(&mut rng);

        // Then
        let parsed = uuid::Uuid::parse_str(&device_id).expect("uuid");
        assert_eq!(parsed.get_version_num(), 4);
        assert_ne!(device_id, "00000000-0000-4000-8000-000000000000");
    }

    #[test]
    fn generate_device_id__should_produce_v4_uuid() {
        // When
        let device_id = generate_device_id();

        // Then
        let parsed = uuid::Uuid::parse_str(&device_id).expect("uuid");
        assert_eq!(parsed.get_version_num(), 4);
    }
}
