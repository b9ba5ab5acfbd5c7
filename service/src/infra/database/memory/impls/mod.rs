//! [`Database`] implementations.

mod contract;
mod identity;
mod installment;
mod maintenance;
mod property;
mod tenant;

use common::operations::{Commit, Transact};
use tracerr::Traced;

use crate::infra::{database, Database};

use super::{Memory, NonTx, Tx};

impl Database<Transact> for Memory<NonTx> {
    type Ok = Memory<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(Memory(Tx::from_non_tx(&self.0).await))
    }
}

impl Database<Transact> for Memory<Tx> {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.commit().await.map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Commit, Insert, Select, Transact},
        DateTime,
    };

    use crate::{
        domain::{
            identity::{self, Email, Password, PasswordHash, Roles},
            Identity,
        },
        infra::{database::memory::state::constraint, Database, Memory},
    };

    fn identity(email: &str) -> Identity {
        Identity {
            id: identity::Id::new(),
            email: Email::new(email).unwrap(),
            password_hash: PasswordHash::new(&Password::new("pass").unwrap())
                .unwrap(),
            is_enabled: true,
            roles: Roles::default(),
            created_at: DateTime::now().coerce(),
        }
    }

    #[tokio::test]
    async fn tx_changes_are_published_on_commit() {
        let db = Memory::new();
        let mario = identity("mario@example.it");

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Insert(mario.clone())).await.unwrap();
        assert!(tx
            .execute(Select(By::<Option<Identity>, _>::new(mario.id)))
            .await
            .unwrap()
            .is_some());
        tx.execute(Commit).await.unwrap();
        drop(tx);

        assert!(db
            .execute(Select(By::<Option<Identity>, _>::new(mario.id)))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn dropped_tx_is_rolled_back() {
        let db = Memory::new();
        let mario = identity("mario@example.it");

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Insert(mario.clone())).await.unwrap();
        drop(tx);

        assert!(db
            .execute(Select(By::<Option<Identity>, _>::new(mario.id)))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn committed_tx_cannot_be_reused() {
        let db = Memory::new();

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Commit).await.unwrap();

        assert!(tx
            .execute(Insert(identity("mario@example.it")))
            .await
            .is_err());
        assert!(tx.execute(Commit).await.is_err());
    }

    #[tokio::test]
    async fn enforces_unique_email() {
        let db = Memory::new();
        db.execute(Insert(identity("mario@example.it"))).await.unwrap();

        let err = db
            .execute(Insert(identity("MARIO@example.it")))
            .await
            .unwrap_err();

        assert!(err
            .as_ref()
            .is_unique_violation(Some(constraint::IDENTITY_EMAIL)));
    }
}
