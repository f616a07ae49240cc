//! One-shot credential derivation for pending accounts.
//!
//! The hasher replaces a plaintext password with an Argon2id-derived key and
//! a fresh random salt. Running it on an already-derived candidate is a
//! no-op, so a retried registration step never hashes a hash.

use std::fmt;

use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use super::{NewAccount, Password};

/// Length in bytes of the derived key.
pub const DERIVED_KEY_LEN: usize = 32;
/// Length in bytes of the per-account salt.
pub const SALT_LEN: usize = 32;

/// Password state of a pending account.
#[derive(Debug)]
pub enum Credential {
    /// Plaintext as submitted; never persisted.
    Plain(Password),
    /// Key and salt ready to store.
    Derived(DerivedCredential),
}

/// Derived key and the salt it was derived with.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedCredential {
    key: [u8; DERIVED_KEY_LEN],
    salt: [u8; SALT_LEN],
}

impl DerivedCredential {
    /// Argon2id output.
    pub fn key(&self) -> &[u8; DERIVED_KEY_LEN] {
        &self.key
    }

    /// Random salt the key was derived with.
    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }
}

impl fmt::Debug for DerivedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedCredential")
            .field("key", &"<redacted>")
            .field("salt", &"<redacted>")
            .finish()
    }
}

/// Failures raised while deriving a credential. Both abort registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("secure randomness unavailable: {message}")]
    Randomness { message: String },
    #[error("key derivation failed: {message}")]
    Derivation { message: String },
}

/// Argon2id work factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostParameters {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes over memory.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for CostParameters {
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Derives stored credentials from plaintext passwords.
///
/// # Examples
/// ```
/// use hostwatch::domain::{CredentialHasher, NewAccount, Password};
/// use hostwatch::domain::credentials::CostParameters;
///
/// let hasher = CredentialHasher::with_cost(CostParameters {
///     memory_kib: 64,
///     iterations: 1,
///     parallelism: 1,
/// });
/// let mut candidate =
///     NewAccount::try_from_parts("alice", "alice@example.com", Password::new("s3cret"))
///         .expect("valid candidate");
/// hasher.derive(&mut candidate).expect("derivation succeeds");
/// assert!(candidate.credential_derived());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialHasher {
    cost: CostParameters,
}

impl CredentialHasher {
    /// Hasher with the default [`CostParameters`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Hasher with explicit work factors.
    pub fn with_cost(cost: CostParameters) -> Self {
        Self { cost }
    }

    /// Derive the candidate's credential using the operating system RNG.
    pub fn derive(&self, account: &mut NewAccount) -> Result<(), CredentialError> {
        self.derive_with(account, &mut OsRng)
    }

    /// Derive the candidate's credential drawing the salt from `rng`.
    ///
    /// Leaves the candidate untouched when its credential is already derived
    /// or when derivation fails.
    pub fn derive_with<R>(&self, account: &mut NewAccount, rng: &mut R) -> Result<(), CredentialError>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let Credential::Plain(password) = account.credential() else {
            return Ok(());
        };

        let mut salt = [0_u8; SALT_LEN];
        rng.try_fill_bytes(&mut salt)
            .map_err(|err| CredentialError::Randomness {
                message: err.to_string(),
            })?;
        let key = self.stretch(password, &salt)?;

        account.set_credential(Credential::Derived(DerivedCredential {
            key: *key,
            salt,
        }));
        Ok(())
    }

    /// Recompute the key for `password` under a stored salt and compare it.
    pub fn verify(
        &self,
        password: &Password,
        stored: &DerivedCredential,
    ) -> Result<bool, CredentialError> {
        let key = self.stretch(password, &stored.salt)?;
        Ok(key.as_slice() == stored.key.as_slice())
    }

    fn stretch(
        &self,
        password: &Password,
        salt: &[u8; SALT_LEN],
    ) -> Result<Zeroizing<[u8; DERIVED_KEY_LEN]>, CredentialError> {
        let params = Params::new(
            self.cost.memory_kib,
            self.cost.iterations,
            self.cost.parallelism,
            Some(DERIVED_KEY_LEN),
        )
        .map_err(derivation_error)?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let mut key = Zeroizing::new([0_u8; DERIVED_KEY_LEN]);
        argon2
            .hash_password_into(password.as_bytes(), salt, key.as_mut_slice())
            .map_err(derivation_error)?;
        Ok(key)
    }
}

fn derivation_error(err: argon2::Error) -> CredentialError {
    CredentialError::Derivation {
        message: err.to_string(),
    }
}
