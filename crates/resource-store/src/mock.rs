//! # Mock Provider & Testing Guide
//!
//! [`MockProvider`] implements [`StorageProvider<Resource>`] without storing
//! anything. Each call pops the next queued expectation and returns the
//! response that was set for it, and every call is recorded so a test can
//! assert exactly what the [`ResourceStore`](crate::ResourceStore) forwarded.
//!
//! | Feature | MockProvider | MemoryProvider |
//! |---------|--------------|----------------|
//! | **State** | None (expectations) | Real map |
//! | **Error Injection** | Easy (`return_err`, `fail_init`) | Not possible |
//! | **Use Case** | Testing code *around* the provider | Testing behavior end to end |
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use resource_store::mock::{MockProvider, ProviderCall};
//! use resource_store::{ResourceStore, StorageConfig, StorageError};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = Arc::new(MockProvider::new());
//!     mock.expect_get("task:1").return_err(StorageError::Backend("disk on fire".into()));
//!
//!     let store = ResourceStore::new(StorageConfig::custom(mock.clone()));
//!     let err = store.get_resource("task", "1").await.unwrap_err();
//!     assert!(matches!(err, StorageError::Backend(_)));
//!
//!     assert_eq!(mock.calls(), vec![ProviderCall::Init, ProviderCall::Get("task:1".into())]);
//!     mock.verify();
//! }
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{StorageError, StorageResult};
use crate::provider::StorageProvider;
use crate::resource::Resource;

/// A call received by a [`MockProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Init,
    Create(String),
    Get(String),
    List(String),
    Update(String),
    Delete(String),
    Close,
}

#[derive(Debug)]
enum Expectation {
    Create { key: String, response: StorageResult<()> },
    Get { key: String, response: StorageResult<Option<Resource>> },
    List { prefix: String, response: StorageResult<Vec<Resource>> },
    Update { key: String, response: StorageResult<()> },
    Delete { key: String, response: StorageResult<bool> },
}

type Expectations = Arc<Mutex<VecDeque<Expectation>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Expectation-driven [`StorageProvider`] for tests.
#[derive(Debug, Default)]
pub struct MockProvider {
    expectations: Expectations,
    calls: Mutex<Vec<ProviderCall>>,
    init_error: Mutex<Option<StorageError>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_create(&self, key: &str) -> ExpectationBuilder<()> {
        self.builder(key, |key, response| Expectation::Create { key, response })
    }

    pub fn expect_get(&self, key: &str) -> ExpectationBuilder<Option<Resource>> {
        self.builder(key, |key, response| Expectation::Get { key, response })
    }

    pub fn expect_list(&self, prefix: &str) -> ExpectationBuilder<Vec<Resource>> {
        self.builder(prefix, |prefix, response| Expectation::List { prefix, response })
    }

    pub fn expect_update(&self, key: &str) -> ExpectationBuilder<()> {
        self.builder(key, |key, response| Expectation::Update { key, response })
    }

    pub fn expect_delete(&self, key: &str) -> ExpectationBuilder<bool> {
        self.builder(key, |key, response| Expectation::Delete { key, response })
    }

    /// Makes the next `init` call fail with `error`.
    pub fn fail_init(&self, error: StorageError) {
        *lock(&self.init_error) = Some(error);
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<ProviderCall> {
        lock(&self.calls).clone()
    }

    /// Panics unless every queued expectation was consumed.
    pub fn verify(&self) {
        let remaining = lock(&self.expectations).len();
        if remaining > 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }

    fn builder<R>(
        &self,
        key: &str,
        wrap: fn(String, StorageResult<R>) -> Expectation,
    ) -> ExpectationBuilder<R> {
        ExpectationBuilder {
            key: key.to_string(),
            wrap,
            expectations: self.expectations.clone(),
        }
    }

    fn next(&self, call: ProviderCall) -> (ProviderCall, Option<Expectation>) {
        lock(&self.calls).push(call.clone());
        (call, lock(&self.expectations).pop_front())
    }
}

fn unexpected(call: ProviderCall) -> StorageError {
    StorageError::Backend(format!("Unexpected call or expectation mismatch: {call:?}"))
}

/// Sets the response for one queued expectation.
pub struct ExpectationBuilder<R> {
    key: String,
    wrap: fn(String, StorageResult<R>) -> Expectation,
    expectations: Expectations,
}

impl<R> ExpectationBuilder<R> {
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: StorageError) {
        self.push(Err(error));
    }

    fn push(self, response: StorageResult<R>) {
        lock(&self.expectations).push_back((self.wrap)(self.key, response));
    }
}

#[async_trait]
impl StorageProvider<Resource> for MockProvider {
    fn backend(&self) -> &'static str {
        "mock"
    }

    async fn init(&self) -> StorageResult<()> {
        lock(&self.calls).push(ProviderCall::Init);
        match lock(&self.init_error).take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn create(&self, key: &str, _value: Resource) -> StorageResult<()> {
        match self.next(ProviderCall::Create(key.to_string())) {
            (_, Some(Expectation::Create { key: expected, response })) if expected == key => {
                response
            }
            (call, _) => Err(unexpected(call)),
        }
    }

    async fn get(&self, key: &str) -> StorageResult<Option<Resource>> {
        match self.next(ProviderCall::Get(key.to_string())) {
            (_, Some(Expectation::Get { key: expected, response })) if expected == key => response,
            (call, _) => Err(unexpected(call)),
        }
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<Resource>> {
        match self.next(ProviderCall::List(prefix.to_string())) {
            (_, Some(Expectation::List { prefix: expected, response })) if expected == prefix => {
                response
            }
            (call, _) => Err(unexpected(call)),
        }
    }

    async fn update(&self, key: &str, _value: Resource) -> StorageResult<()> {
        match self.next(ProviderCall::Update(key.to_string())) {
            (_, Some(Expectation::Update { key: expected, response })) if expected == key => {
                response
            }
            (call, _) => Err(unexpected(call)),
        }
    }

    async fn delete(&self, key: &str) -> StorageResult<bool> {
        match self.next(ProviderCall::Delete(key.to_string())) {
            (_, Some(Expectation::Delete { key: expected, response })) if expected == key => {
                response
            }
            (call, _) => Err(unexpected(call)),
        }
    }

    async fn close(&self) -> StorageResult<()> {
        lock(&self.calls).push(ProviderCall::Close);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_with_expectations() {
        let mock = MockProvider::new();
        mock.expect_create("task:1").return_ok(());
        mock.expect_get("task:1").return_ok(Some(Resource::new("task", "1")));
        mock.expect_delete("task:1").return_ok(true);

        mock.create("task:1", Resource::new("task", "1")).await.unwrap();
        let found = mock.get("task:1").await.unwrap().unwrap();
        assert_eq!(found.id(), "1");
        assert!(mock.delete("task:1").await.unwrap());

        mock.verify();
        assert_eq!(
            mock.calls(),
            vec![
                ProviderCall::Create("task:1".into()),
                ProviderCall::Get("task:1".into()),
                ProviderCall::Delete("task:1".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_mismatch_is_an_error() {
        let mock = MockProvider::new();
        mock.expect_get("task:1").return_ok(None);

        let err = mock.get("task:2").await.unwrap_err();
        assert!(matches!(err, StorageError::Backend(_)));
        assert!(mock.list("task:").await.is_err());
    }

    #[tokio::test]
    async fn test_fail_init_once() {
        let mock = MockProvider::new();
        mock.fail_init(StorageError::NotInitialized { backend: "mock" });
        assert!(mock.init().await.is_err());
        assert!(mock.init().await.is_ok());
    }
}
