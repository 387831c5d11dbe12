use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::users::repo::UserStore;
use crate::users::repo_types::{User, UserFields};

/// Fresh user id: a random v4 UUID written as its 128-bit integer.
pub fn new_user_id() -> String {
    Uuid::new_v4().as_u128().to_string()
}

pub async fn load_user(store: &dyn UserStore, id: &str) -> Result<User, ApiError> {
    match store.find_by_id(id).await? {
        Some(user) => Ok(user),
        None => {
            debug!(user_id = %id, "user lookup missed");
            Err(ApiError::user_not_found(id))
        }
    }
}

pub async fn create_user(store: &dyn UserStore, fields: UserFields) -> Result<User, ApiError> {
    let user = User::new(new_user_id(), fields);
    store.insert(&user).await?;
    info!(user_id = %user.id, "user created");
    Ok(user)
}

pub async fn replace_user(
    store: &dyn UserStore,
    id: &str,
    fields: UserFields,
) -> Result<User, ApiError> {
    store.update_fields(id, &fields.clone().into()).await?;
    info!(user_id = %id, "user updated");
    Ok(User::new(id.to_string(), fields))
}

pub async fn delete_user(store: &dyn UserStore, id: &str) -> Result<(), ApiError> {
    store.delete_by_id(id).await?;
    info!(user_id = %id, "user deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::memory::InMemoryUserStore;

    #[test]
    fn new_ids_are_decimal_and_unique() {
        let a = new_user_id();
        let b = new_user_id();
        assert_ne!(a, b);
        assert!(a.bytes().all(|c| c.is_ascii_digit()));
        assert!(a.parse::<u128>().is_ok());
    }

    #[tokio::test]
    async fn replace_on_vanished_user_is_not_found() {
        let store = InMemoryUserStore::new();
        let fields = UserFields {
            firstname: "A".into(),
            lastname: "B".into(),
            latitude: "1".into(),
            longitude: "2".into(),
        };
        let err = replace_user(&store, "5", fields).await.unwrap_err();
        assert_eq!(err.to_string(), "User with ID 5 not found");
    }
}
