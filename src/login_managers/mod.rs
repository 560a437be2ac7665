use std::sync::OnceLock;

use anyhow::anyhow;
use uuid::Uuid;

use crate::models::StaffAccount;

/// Session data keys set at login.
pub const BARBER_ID: &str = "barber_id";
pub const BARBER_NAME: &str = "barber_name";

pub mod password_login {
    use super::*;

    pub fn hash_password(password: &str) -> Result<String, anyhow::Error> {
        let salt = Uuid::new_v4();
        let config = argon2::Config::default();
        argon2::hash_encoded(password.as_bytes(), salt.as_bytes(), &config)
            .map_err(|e| anyhow!("hash password error: {}", e))
    }

    pub(super) static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

    /// Disabled accounts and malformed hashes never verify. The argon2 check
    /// runs in every case, so disabled accounts answer as slowly as live ones.
    pub fn verify_password(account: &StaffAccount, password: &str) -> bool {
        let verified = match argon2::verify_encoded(&account.password_hash, password.as_bytes()) {
            Ok(verified) => verified,
            Err(e) => {
                tracing::warn!("unreadable password hash for barber {}: {}", account.barber_id, e);
                false
            }
        };
        verified && account.enabled
    }

    /// Checks a login attempt. With no matching account the password is still
    /// verified against a throwaway hash so unknown emails take as long as
    /// known ones.
    pub fn verify_login(account: Option<&StaffAccount>, password: &str) -> bool {
        match account {
            Some(account) => verify_password(account, password),
            None => {
                let dummy = DUMMY_HASH.get_or_init(|| hash_password(&Uuid::new_v4().to_string()).ok());
                if let Some(hash) = dummy {
                    let _ = argon2::verify_encoded(hash, password.as_bytes());
                }
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::password_login::*;
    use super::*;

    fn account(password_hash: String, enabled: bool) -> StaffAccount {
        StaffAccount {
            barber_id: Uuid::new_v4(),
            email: "helga@example.com".into(),
            password_hash,
            enabled,
        }
    }

    #[test]
    fn verifies_only_the_right_password() {
        let hash = hash_password("s3cret").unwrap();
        assert!(verify_password(&account(hash.clone(), true), "s3cret"));
        assert!(!verify_password(&account(hash.clone(), true), "S3cret"));
        assert!(!verify_password(&account(hash, false), "s3cret"));
    }

    #[test]
    fn unknown_account_still_hashes() {
        assert!(!verify_login(None, "s3cret"));
        assert!(matches!(DUMMY_HASH.get(), Some(Some(_))));

        let hash = hash_password("s3cret").unwrap();
        assert!(verify_login(Some(&account(hash, true)), "s3cret"));
    }

    #[test]
    fn garbage_hash_does_not_verify() {
        assert!(!verify_password(&account("plain".into(), true), "plain"));
    }
}
