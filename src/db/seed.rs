use crate::db::traits::UserStore;
use crate::types::Result;
use crate::utils::toml_config::SeedUser;
use tracing::{debug, info};

/// Inserts the configured users that are not in the store yet.
///
/// Existing users are left untouched, so restarting against a file-backed
/// database does not reset passwords changed since. Returns how many users
/// were created.
pub async fn seed_users(store: &dyn UserStore, users: &[SeedUser]) -> Result<usize> {
    let mut created = 0;

    for seed in users {
        if store.find_by_username(&seed.username).await?.is_some() {
            debug!(username = %seed.username, "Seed user already present");
            continue;
        }

        let user = store
            .create_user(&seed.username, &seed.password_hash, &seed.roles)
            .await?;
        info!(username = %user.username, id = user.id, roles = ?user.roles, "Seeded user");
        created += 1;
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::TursoUserStore;

    fn seed(username: &str, roles: &[&str]) -> SeedUser {
        SeedUser {
            username: username.to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = TursoUserStore::new_memory().await.unwrap();
        let users = vec![seed("alice", &["USER"]), seed("root", &["USER", "ADMIN"])];

        assert_eq!(seed_users(&store, &users).await.unwrap(), 2);
        assert_eq!(seed_users(&store, &users).await.unwrap(), 0);

        let root = store.find_by_username("root").await.unwrap().unwrap();
        assert_eq!(root.roles, vec!["USER", "ADMIN"]);
        assert_eq!(store.list_users().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_seed_keeps_existing_user() {
        let store = TursoUserStore::new_memory().await.unwrap();
        store
            .create_user("alice", "$argon2id$original", &["ADMIN".to_string()])
            .await
            .unwrap();

        assert_eq!(seed_users(&store, &[seed("alice", &["USER"])]).await.unwrap(), 0);

        let alice = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(alice.password_hash, "$argon2id$original");
        assert_eq!(alice.roles, vec!["ADMIN"]);
    }
}
