use async_trait::async_trait;
use redis::{AsyncCommands, Client};

use super::{KvStore, StorageError};

/// Redis-backed slot, selected when `REDIS_URL` is configured.
#[derive(Clone)]
pub struct RedisKvStore {
    client: Client,
}

impl RedisKvStore {
    pub fn open(url: &str) -> Result<Self, StorageError> {
        Ok(Self {
            client: Client::open(url)?,
        })
    }
}

#[async_trait]
impl KvStore for RedisKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        Ok(conn.get(key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_rejects_malformed_url() {
        assert!(matches!(
            RedisKvStore::open("not a redis url"),
            Err(StorageError::Redis(_))
        ));
    }

    #[test]
    fn test_open_does_not_connect() {
        // Client::open only parses; the connection is made per call.
        assert!(RedisKvStore::open("redis://127.0.0.1:1/").is_ok());
    }
}
