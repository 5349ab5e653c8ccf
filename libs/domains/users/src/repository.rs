use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::EmailReusePolicy;
use crate::error::{UserError, UserResult};
use crate::models::{NewUser, User, UserId};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user under the next id.
    ///
    /// Fails with `DuplicateEmail` if the email is taken. The uniqueness
    /// check and the insert are one atomic step. Under
    /// [`EmailReusePolicy::Never`] the email stays taken after the user is
    /// removed.
    async fn insert(&self, user: NewUser, email_reuse: EmailReusePolicy) -> UserResult<User>;

    /// Get a user by ID
    async fn get_by_id(&self, id: UserId) -> UserResult<Option<User>>;

    /// Users in creation order, skipping `offset` and returning at most
    /// `limit`, together with the total count from the same snapshot.
    async fn page(&self, offset: usize, limit: usize) -> UserResult<(Vec<User>, usize)>;

    /// Remove a user by ID, returning the removed record
    async fn remove(&self, id: UserId) -> UserResult<Option<User>>;

    /// Number of users currently present
    async fn count(&self) -> UserResult<usize>;
}

#[derive(Debug, Default)]
struct Store {
    /// Ordered by id, which is also creation order
    users: Vec<User>,
    /// Users ever created; the next id is `created + 1`
    created: u64,
    /// Emails that stay taken after deletion
    reserved: HashSet<String>,
}

impl Store {
    fn position(&self, id: UserId) -> Result<usize, usize> {
        self.users.binary_search_by_key(&id, |u| u.id)
    }
}

/// In-memory implementation of UserRepository
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: NewUser, email_reuse: EmailReusePolicy) -> UserResult<User> {
        let mut store = self.store.write().await;
        let email = user.email.as_str();

        let taken = store.reserved.contains(email) || store.users.iter().any(|u| u.email == email);
        if taken {
            return Err(UserError::DuplicateEmail(email.to_string()));
        }

        let id = UserId::new(store.created + 1).ok_or(UserError::IdsExhausted)?;
        store.created += 1;

        if email_reuse == EmailReusePolicy::Never {
            store.reserved.insert(email.to_string());
        }

        let user = User {
            id,
            name: user.name.into_inner(),
            email: user.email.into_inner(),
            created_at: Utc::now(),
        };
        store.users.push(user.clone());

        Ok(user)
    }

    async fn get_by_id(&self, id: UserId) -> UserResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.position(id).ok().map(|idx| store.users[idx].clone()))
    }

    async fn page(&self, offset: usize, limit: usize) -> UserResult<(Vec<User>, usize)> {
        let store = self.store.read().await;
        let users = store.users.iter().skip(offset).take(limit).cloned().collect();
        Ok((users, store.users.len()))
    }

    async fn remove(&self, id: UserId) -> UserResult<Option<User>> {
        let mut store = self.store.write().await;

        match store.position(id) {
            Ok(idx) => Ok(Some(store.users.remove(idx))),
            Err(_) => Ok(None),
        }
    }

    async fn count(&self) -> UserResult<usize> {
        Ok(self.store.read().await.users.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DirectoryConfig;
    use crate::models::CreateUser;
    use crate::validation::validate_create;

    const REUSE: EmailReusePolicy = EmailReusePolicy::AfterDelete;

    fn new_user(name: &str, email: &str) -> NewUser {
        let input = CreateUser {
            name: name.to_string(),
            email: email.to_string(),
        };
        validate_create(&input, &DirectoryConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = InMemoryUserRepository::new();

        let created = repo
            .insert(new_user("John Doe", "john@example.com"), REUSE)
            .await
            .unwrap();
        assert_eq!(created.id.get(), 1);
        assert_eq!(created.name, "John Doe");

        let fetched = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let repo = InMemoryUserRepository::new();

        repo.insert(new_user("Ann", "A@x.com"), REUSE).await.unwrap();
        let result = repo.insert(new_user("Other Ann", "a@x.com"), REUSE).await;

        assert_eq!(result, Err(UserError::DuplicateEmail("a@x.com".to_string())));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_ids_are_never_reused() {
        let repo = InMemoryUserRepository::new();

        for (name, email) in [("Ann", "a@x.com"), ("Bob", "b@x.com"), ("Cid", "c@x.com")] {
            repo.insert(new_user(name, email), REUSE).await.unwrap();
        }

        let removed = repo.remove(UserId::new(2).unwrap()).await.unwrap();
        assert_eq!(removed.map(|u| u.name), Some("Bob".to_string()));

        let next = repo.insert(new_user("Dee", "d@x.com"), REUSE).await.unwrap();
        assert_eq!(next.id.get(), 4);
        assert!(repo.get_by_id(UserId::new(2).unwrap()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_missing_returns_none() {
        let repo = InMemoryUserRepository::new();
        assert!(repo.remove(UserId::new(1).unwrap()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_email_reusable_after_delete_by_default() {
        let repo = InMemoryUserRepository::new();

        let user = repo.insert(new_user("Ann", "a@x.com"), REUSE).await.unwrap();
        repo.remove(user.id).await.unwrap();

        let again = repo.insert(new_user("Ann", "a@x.com"), REUSE).await.unwrap();
        assert_eq!(again.id.get(), 2);
    }

    #[tokio::test]
    async fn test_email_reserved_under_never_policy() {
        let repo = InMemoryUserRepository::new();
        let never = EmailReusePolicy::Never;

        let user = repo.insert(new_user("Ann", "a@x.com"), never).await.unwrap();
        repo.remove(user.id).await.unwrap();

        let result = repo.insert(new_user("Ann", "a@x.com"), never).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_page_keeps_insertion_order() {
        let repo = InMemoryUserRepository::new();
        for i in 0..5u8 {
            let letter = (b'a' + i) as char;
            let user = new_user(&format!("User {}", letter), &format!("{}@x.com", letter));
            repo.insert(user, REUSE).await.unwrap();
        }

        let (users, total) = repo.page(2, 2).await.unwrap();
        assert_eq!(total, 5);
        let ids: Vec<u64> = users.iter().map(|u| u.id.get()).collect();
        assert_eq!(ids, vec![3, 4]);

        let (users, total) = repo.page(10, 2).await.unwrap();
        assert!(users.is_empty());
        assert_eq!(total, 5);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_get_distinct_ids() {
        let repo = InMemoryUserRepository::new();

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.insert(new_user("Racer", &format!("racer{}@x.com", i)), REUSE)
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().id.get());
        }
        ids.sort_unstable();

        assert_eq!(ids, (1..=20).collect::<Vec<u64>>());
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_email_single_winner() {
        let repo = InMemoryUserRepository::new();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.insert(new_user("Twin", "twin@x.com"), REUSE).await
                })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
