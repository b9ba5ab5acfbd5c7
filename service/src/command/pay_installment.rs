//! [`Command`] for paying an [`Installment`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{installment, Installment},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for marking an unpaid [`Installment`] as paid.
#[derive(Clone, Copy, Debug, From)]
pub struct PayInstallment {
    /// ID of the [`Installment`] to pay.
    pub installment_id: installment::Id,
}

impl<Db> Command<PayInstallment> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Installment>, installment::Id>>,
            Ok = Option<Installment>,
            Err = Traced<database::Error>,
        > + Database<Update<Installment>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Installment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: PayInstallment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let PayInstallment { installment_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut installment = tx
            .execute(Select(By::<Option<Installment>, _>::new(installment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::InstallmentNotExists(installment_id))
            .map_err(tracerr::wrap!())?;
        if installment.is_paid() {
            return Err(tracerr::new!(E::AlreadyPaid(installment_id)));
        }

        installment.status = installment::Status::Paid;
        installment.paid_at = Some(DateTime::now().coerce());
        tx.execute(Update(installment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tracing::info!(
            installment.id = %installment.id,
            contract.id = %installment.contract_id,
            number = %installment.number,
            "`Installment` paid",
        );

        Ok(installment)
    }
}

/// Error of [`PayInstallment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Installment`] is paid already.
    #[display("`Installment(id: {_0})` is already paid")]
    #[from(ignore)]
    AlreadyPaid(#[error(not(source))] installment::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Installment`] doesn't exist.
    #[display("`Installment(id: {_0})` does not exist")]
    #[from(ignore)]
    InstallmentNotExists(#[error(not(source))] installment::Id),
}
