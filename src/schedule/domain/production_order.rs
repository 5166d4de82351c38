//! Production orders placed on the production plan.

use super::{ItemId, ItemKind, JobId, ParseStatusError, PlanUpdate, RoleId, Schedulable};
use crate::calendar::PlannedAt;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Production order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionOrderStatus {
    /// Ordered but not yet on the plan.
    Pending,
    /// Planned for a production day.
    Planned,
    /// Being manufactured.
    InProduction,
    /// Delivered.
    Completed,
}

impl ProductionOrderStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Planned => "planned",
            Self::InProduction => "in_production",
            Self::Completed => "completed",
        }
    }
}

impl TryFrom<&str> for ProductionOrderStatus {
    type Error = ParseStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "planned" => Ok(Self::Planned),
            "in_production" => Ok(Self::InProduction),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseStatusError(value.to_owned())),
        }
    }
}

/// Manufacturing order for a job role's items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionOrder {
    id: ItemId,
    job_id: JobId,
    role_id: RoleId,
    planned_date: Option<PlannedAt>,
    assembly_date: Option<NaiveDate>,
    status: ProductionOrderStatus,
}

impl ProductionOrder {
    /// Creates a pending, unplanned production order.
    #[must_use]
    pub const fn new(id: ItemId, job_id: JobId, role_id: RoleId) -> Self {
        Self {
            id,
            job_id,
            role_id,
            planned_date: None,
            assembly_date: None,
            status: ProductionOrderStatus::Pending,
        }
    }

    /// Plans the order on `date`.
    #[must_use]
    pub const fn planned_on(mut self, date: NaiveDate) -> Self {
        self.planned_date = Some(PlannedAt::on(date));
        self.status = ProductionOrderStatus::Planned;
        self
    }

    /// Sets the job's assembly date, the latest day production may run.
    #[must_use]
    pub const fn with_assembly_date(mut self, date: NaiveDate) -> Self {
        self.assembly_date = Some(date);
        self
    }

    /// Sets the lifecycle status.
    #[must_use]
    pub const fn with_status(mut self, status: ProductionOrderStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns the job's assembly date, if planned.
    #[must_use]
    pub const fn assembly_date(&self) -> Option<NaiveDate> {
        self.assembly_date
    }
}

impl Schedulable for ProductionOrder {
    type Status = ProductionOrderStatus;

    const KIND: ItemKind = ItemKind::ProductionOrder;

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn planned_date(&self) -> Option<PlannedAt> {
        self.planned_date
    }

    fn status(&self) -> ProductionOrderStatus {
        self.status
    }

    fn is_terminal(&self) -> bool {
        self.status == ProductionOrderStatus::Completed
    }

    fn planned_status(&self) -> ProductionOrderStatus {
        match self.status {
            ProductionOrderStatus::Pending => ProductionOrderStatus::Planned,
            other => other,
        }
    }

    fn unplanned_status(&self) -> Option<ProductionOrderStatus> {
        match self.status {
            ProductionOrderStatus::Pending | ProductionOrderStatus::Planned => {
                Some(ProductionOrderStatus::Pending)
            }
            ProductionOrderStatus::InProduction | ProductionOrderStatus::Completed => None,
        }
    }

    fn apply_plan(&mut self, update: &PlanUpdate<ProductionOrderStatus>) {
        self.planned_date = update.planned_date;
        self.status = update.status;
    }

    fn latest_allowed_date(&self) -> Option<NaiveDate> {
        self.assembly_date
    }

    fn job_id(&self) -> Option<&JobId> {
        Some(&self.job_id)
    }

    fn role_id(&self) -> Option<&RoleId> {
        Some(&self.role_id)
    }
}
