//! Source loader capability.

use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;

// == Getter ==
/// Loads a key from the source of truth when no node has it cached.
///
/// Errors are surfaced to the caller unchanged; a missing key should be
/// reported as an error too.
#[async_trait]
pub trait Getter: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Vec<u8>>;
}

// == Getter Fn ==
/// Adapts a synchronous closure into a [`Getter`].
pub struct GetterFn<F>(pub F);

#[async_trait]
impl<F> Getter for GetterFn<F>
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    async fn get(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        (self.0)(key)
    }
}

// == Async Getter Fn ==
/// Adapts an async closure into a [`Getter`].
///
/// The closure receives an owned key so the returned future can be `'static`.
pub struct AsyncGetterFn<F, Fut> {
    f: F,
    _fut: PhantomData<fn() -> Fut>,
}

impl<F, Fut> AsyncGetterFn<F, Fut>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Vec<u8>>> + Send,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _fut: PhantomData,
        }
    }
}

#[async_trait]
impl<F, Fut> Getter for AsyncGetterFn<F, Fut>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Vec<u8>>> + Send,
{
    async fn get(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        (self.f)(key.to_owned()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_getter_fn() {
        let getter = GetterFn(|key: &str| Ok(key.as_bytes().to_vec()));
        assert_eq!(getter.get("abc").await.unwrap(), b"abc".to_vec());
    }

    #[tokio::test]
    async fn test_async_getter_fn() {
        let getter = AsyncGetterFn::new(|key: String| async move {
            if key == "missing" {
                anyhow::bail!("{} not exist", key);
            }
            Ok(key.into_bytes())
        });

        assert_eq!(getter.get("x").await.unwrap(), b"x".to_vec());
        assert_eq!(
            getter.get("missing").await.unwrap_err().to_string(),
            "missing not exist"
        );
    }
}
