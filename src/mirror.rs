//! Cart Mirror
//!
//! Keeps a copy of the cart in a key-value blob store so it survives a restart. The mirror is
//! best effort: a failed write is logged and the cart carries on.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    fs, io,
    path::PathBuf,
};

#[cfg(test)]
use mockall::automock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    cart::{Cart, CartError},
    catalog::Catalog,
    products::ProductId,
};

/// Errors related to reading or writing the cart mirror.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Reading or writing the backing file failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The stored snapshot is not valid JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Keys are limited to ASCII letters, digits, `-` and `_`.
    #[error("invalid blob key: {0:?}")]
    InvalidKey(String),

    /// The snapshot was taken in a different currency to the catalog (snapshot, catalog).
    #[error("cart snapshot is in {0}, but catalog is in {1}")]
    CurrencyMismatch(String, &'static str),

    /// Wrapped cart error.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// A string key-value store.
#[cfg_attr(test, automock)]
pub trait BlobStore {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`MirrorError`] if the store can't be read.
    fn get(&self, key: &str) -> Result<Option<String>, MirrorError>;

    /// Store `value` under `key`, replacing what was there.
    ///
    /// # Errors
    ///
    /// Returns a [`MirrorError`] if the store can't be written.
    fn put(&mut self, key: &str, value: &str) -> Result<(), MirrorError>;
}

/// Blob store held in memory for the life of the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: FxHashMap<String, String>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, MirrorError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), MirrorError> {
        self.blobs.insert(key.to_string(), value.to_string());

        Ok(())
    }
}

/// Blob store keeping one `<key>.json` file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    root: PathBuf,
}

impl FileBlobStore {
    /// Create a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, key: &str) -> Result<PathBuf, MirrorError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(MirrorError::InvalidKey(key.to_string()));
        }

        Ok(self.root.join(format!("{key}.json")))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, MirrorError> {
        match fs::read_to_string(self.path(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), MirrorError> {
        let path = self.path(key)?;
        let tmp = path.with_extension("json.tmp");

        fs::create_dir_all(&self.root)?;

        let written = fs::write(&tmp, value).and_then(|()| fs::rename(&tmp, &path));

        if written.is_err()
            && let Err(error) = fs::remove_file(&tmp)
            && error.kind() != io::ErrorKind::NotFound
        {
            warn!(path = %tmp.display(), %error, "failed to remove temporary cart file");
        }

        Ok(written?)
    }
}

/// One cart line, by product id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotLine {
    /// Product on the line
    pub product_id: ProductId,

    /// Line quantity
    pub quantity: u32,
}

/// Serialized form of a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// ISO currency code
    pub currency: String,

    /// Cart lines, in cart order
    pub lines: Vec<SnapshotLine>,
}

impl CartSnapshot {
    /// Take a snapshot of a cart.
    pub fn of(cart: &Cart) -> Self {
        Self {
            currency: cart.currency().iso_alpha_code.to_string(),
            lines: cart
                .lines()
                .iter()
                .map(|line| SnapshotLine {
                    product_id: line.product_id().clone(),
                    quantity: line.quantity(),
                })
                .collect(),
        }
    }

    /// Rebuild a cart from the snapshot, using current catalog products.
    ///
    /// Lines for products no longer in the catalog, and empty lines, are skipped.
    ///
    /// # Errors
    ///
    /// - [`MirrorError::CurrencyMismatch`]: the snapshot is in another currency.
    /// - [`MirrorError::Cart`]: a line can't be added to the cart.
    pub fn to_cart(&self, catalog: &Catalog) -> Result<Cart, MirrorError> {
        let currency = catalog.currency();

        if !self.currency.eq_ignore_ascii_case(currency.iso_alpha_code) {
            return Err(MirrorError::CurrencyMismatch(
                self.currency.clone(),
                currency.iso_alpha_code,
            ));
        }

        let mut cart = Cart::new(currency);

        for line in &self.lines {
            let Some(product) = catalog.get(&line.product_id) else {
                debug!(product_id = %line.product_id, "skipping unknown product in cart snapshot");
                continue;
            };

            if line.quantity == 0 {
                continue;
            }

            cart.add(product, line.quantity)?;
        }

        Ok(cart)
    }
}

/// Writes the cart to a [`BlobStore`] after every change.
pub struct CartMirror {
    store: Box<dyn BlobStore>,
    key: String,
}

impl CartMirror {
    /// Key the cart is stored under unless configured otherwise.
    pub const DEFAULT_KEY: &'static str = "cart";

    /// Create a mirror writing to the given store under [`Self::DEFAULT_KEY`].
    pub fn new(store: impl BlobStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            key: Self::DEFAULT_KEY.to_string(),
        }
    }

    /// Store the cart under another key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Returns the key the cart is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Write the cart to the store.
    ///
    /// # Errors
    ///
    /// Returns a [`MirrorError`] if the cart can't be serialized or the store write fails.
    pub fn save(&mut self, cart: &Cart) -> Result<(), MirrorError> {
        let json = serde_json::to_string(&CartSnapshot::of(cart))?;

        self.store.put(&self.key, &json)
    }

    /// Write the cart to the store, logging rather than returning any failure.
    pub fn sync(&mut self, cart: &Cart) {
        match self.save(cart) {
            Ok(()) => debug!(key = %self.key, lines = cart.len(), "cart mirrored"),
            Err(error) => warn!(key = %self.key, %error, "failed to mirror cart"),
        }
    }

    /// Read the last saved snapshot, if there is one.
    ///
    /// # Errors
    ///
    /// Returns a [`MirrorError`] if the store can't be read or holds invalid JSON.
    pub fn load(&self) -> Result<Option<CartSnapshot>, MirrorError> {
        self.store
            .get(&self.key)?
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(MirrorError::from)
    }
}

impl Debug for CartMirror {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CartMirror")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
