//! Data models for the application.

mod record;
mod user;

pub use record::{normalize_notes, Record, EMPTY_NOTES};
pub use user::{User, UserInfo, DEFAULT_PROFILE_IMAGE};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use vision::Prediction;

    async fn pool() -> sqlx::SqlitePool {
        let pool = db::connect_in_memory().await.unwrap();
        db::migrate(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_user_create_and_lookup() {
        let pool = pool().await;
        let user = User::create(&pool, "alice", "alice@example.com", "hash")
            .await
            .unwrap();
        assert_eq!(user.image_file, DEFAULT_PROFILE_IMAGE);

        let by_email = User::find_by_email(&pool, "alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);
        assert!(User::find_by_id(&pool, user.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_username_and_email() {
        let pool = pool().await;
        let alice = User::create(&pool, "alice", "alice@example.com", "hash")
            .await
            .unwrap();

        assert!(User::username_taken(&pool, "alice", None).await.unwrap());
        assert!(!User::username_taken(&pool, "alice", Some(alice.id)).await.unwrap());
        assert!(User::email_taken(&pool, "alice@example.com", None).await.unwrap());
        assert!(!User::email_taken(&pool, "bob@example.com", None).await.unwrap());

        let duplicate = User::create(&pool, "alice", "other@example.com", "hash").await;
        assert!(duplicate.is_err());
    }

    #[tokio::test]
    async fn test_update_profile() {
        let pool = pool().await;
        let alice = User::create(&pool, "alice", "alice@example.com", "hash")
            .await
            .unwrap();
        let updated = User::update_profile(&pool, alice.id, "alice2", "a2@example.com", "abc.png")
            .await
            .unwrap();
        assert_eq!(updated.username, "alice2");
        assert_eq!(updated.to_info().image_url(), "/static/images/profile_pics/abc.png");
    }

    #[tokio::test]
    async fn test_record_lifecycle() {
        let pool = pool().await;
        let alice = User::create(&pool, "alice", "alice@example.com", "hash")
            .await
            .unwrap();
        let prediction = Prediction::new(vec![0.1, 0.2, 0.3, 0.1, 0.1, 0.1, 0.1]);

        let first = Record::create(&pool, alice.id, "a.png", &prediction, EMPTY_NOTES)
            .await
            .unwrap();
        let second = Record::create(&pool, alice.id, "b.png", &prediction, "crowded gate")
            .await
            .unwrap();
        assert_eq!(first.prediction().unwrap(), prediction);
        assert!(first.is_owned_by(alice.id));

        let listed = Record::list_for_user(&pool, alice.id).await.unwrap();
        let ids: Vec<i64> = listed.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);

        assert!(Record::update_notes(&pool, first.id, "edited").await.unwrap());
        let reloaded = Record::find(&pool, first.id).await.unwrap().unwrap();
        assert_eq!(reloaded.notes.as_deref(), Some("edited"));

        assert!(Record::delete(&pool, first.id).await.unwrap());
        assert!(!Record::delete(&pool, first.id).await.unwrap());
        assert_eq!(Record::list_for_user(&pool, alice.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_transaction_rollback_discards_record() {
        let pool = pool().await;
        let alice = User::create(&pool, "alice", "alice@example.com", "hash")
            .await
            .unwrap();
        let prediction = Prediction::new(vec![1.0]);

        let mut tx = pool.begin().await.unwrap();
        Record::create(&mut *tx, alice.id, "a.png", &prediction, EMPTY_NOTES)
            .await
            .unwrap();
        tx.rollback().await.unwrap();

        assert!(Record::list_for_user(&pool, alice.id).await.unwrap().is_empty());
    }

    #[test]
    fn test_normalize_notes() {
        let placeholder = "Add some notes.(Optional)";
        assert_eq!(normalize_notes(None, placeholder), EMPTY_NOTES);
        assert_eq!(normalize_notes(Some("   "), placeholder), EMPTY_NOTES);
        assert_eq!(normalize_notes(Some(placeholder), placeholder), EMPTY_NOTES);
        assert_eq!(normalize_notes(Some(" busy "), placeholder), "busy");
    }
}
