//! Typed view data for the simulation apps and their partial-update payloads.
//!
//! `WindowOpened` carries a full data document that replaces an app's view state; `AppUpdate`
//! carries a partial one whose present fields overwrite and whose absent fields are kept. Each
//! data struct therefore has a twin update struct with every field optional.
//!
//! The backend pushes updates as [`AppUpdateEnvelope`]s keyed by numeric app id; decoding one
//! yields the typed [`AppUpdate`] for that app.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{
    graph::{Granularity, GraphSeries},
    AppKind,
};

/// Declares a view-data struct and its partial-update twin with a shallow `merge_into`.
macro_rules! view_data {
    (
        $(#[$meta:meta])*
        $data:ident, $update:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident: $ty:ty,
            )*
        }
    ) => {
        $(#[$meta])*
        #[allow(missing_docs)]
        #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $data {
            $(
                $(#[$field_meta])*
                pub $field: $ty,
            )*
        }

        #[doc = concat!("Partial [`", stringify!($data), "`]; only `Some` fields are applied.")]
        #[allow(missing_docs)]
        #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $update {
            $(
                $(#[$field_meta])*
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )*
        }

        impl $update {
            /// Overwrites the fields present in `self`; nested values are replaced whole.
            pub fn merge_into(self, target: &mut $data) {
                $(
                    if let Some(value) = self.$field {
                        target.$field = value;
                    }
                )*
            }
        }
    };
}

/// Income tax rule.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxRule {
    /// Whether the rule applies.
    pub enabled: bool,
    /// Salary below which no tax is taken.
    pub minimum_salary: i64,
    /// Tax rate.
    pub tax_rate: f64,
}

/// Business tax rule.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessTaxRule {
    /// Whether the rule applies.
    pub enabled: bool,
    /// Monthly income below which no tax is taken.
    pub minimum_monthly_income: f64,
    /// Tax rate.
    pub tax_rate: f64,
}

/// Rules shown in the finance app.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FinanceRules {
    /// Income tax.
    pub tax: TaxRule,
    /// Business tax.
    pub business_tax: BusinessTaxRule,
}

/// Business funding rule.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessFundingRule {
    /// Whether the rule applies.
    pub enabled: bool,
    /// Businesses currently funded.
    pub business_count: i64,
    /// Monthly fund per business.
    pub fund: i64,
    /// Income above which a business is not funded.
    pub maximum_income: i64,
    /// Monthly budget cost of the rule.
    pub budget_cost: i64,
}

/// Rules shown in the business app.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessRules {
    /// Funding.
    pub funding: BusinessFundingRule,
}

/// Hospital admission age cap.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DenyAgeRule {
    /// Whether the rule applies.
    pub enabled: bool,
    /// Oldest admitted age.
    pub maximum_age: i64,
}

/// Hospital admission health cap.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DenyHealthRule {
    /// Whether the rule applies.
    pub enabled: bool,
    /// Health percentage above which admission is denied.
    pub maximum_percentage: i64,
}

/// Rules shown in the healthcare app.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthcareRules {
    /// Age cap.
    pub deny_past_age: DenyAgeRule,
    /// Health cap.
    pub deny_past_health: DenyHealthRule,
}

/// Capacity of one care group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CareCapacity {
    /// Monthly budget.
    pub budget: i64,
    /// Beds in use.
    pub current_capacity: i64,
    /// Beds available.
    pub total_capacity: i64,
}

/// Population count per age range label (`0-18`, `85+`, ...).
pub type AgeRanges = BTreeMap<String, i64>;

/// Food cover for low earners.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverFoodRule {
    /// Whether the rule applies.
    pub enabled: bool,
    /// Monthly budget cost.
    pub budget_cost: i64,
    /// Salary above which food is not covered.
    pub maximum_salary: i64,
    /// People covered.
    pub people_count: i64,
}

/// Food cover for the unemployed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverFoodUnemployedRule {
    /// Whether the rule applies.
    pub enabled: bool,
    /// Monthly budget cost.
    pub budget_cost: i64,
    /// People covered.
    pub people_count: i64,
}

/// Rules shown in the welfare app.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WelfareRules {
    /// Low-earner food cover.
    pub cover_food: CoverFoodRule,
    /// Unemployed food cover.
    pub cover_food_unemployed: CoverFoodUnemployedRule,
}

view_data! {
    /// Finance app view state.
    FinanceData, FinanceUpdate {
        average_monthly_income: i64,
        business_budget: i64,
        business_tax_rate: i64,
        expected_business_income: i64,
        expected_person_income: i64,
        government_balance: i64,
        healthcare_budget: i64,
        welfare_budget: i64,
        spare_budget: i64,
        tax_rate: i64,
        average_welfare: i64,
        #[serde(alias = "average_welfare_unemployed")]
        average_unemployed_welfare: i64,
        rules: FinanceRules,
        used_hospital_capacity: i64,
        total_hospital_capacity: i64,
        spare_hospital_capacity: i64,
        used_welfare_budget: i64,
        used_business_budget: i64,
        expected_balance: i64,
        government_balance_graph_data: GraphSeries,
        government_balance_prediction_graph_data: GraphSeries,
        average_monthly_income_graph_data: GraphSeries,
        government_losses_graph_data: GraphSeries,
    }
}

view_data! {
    /// Business app view state.
    BusinessData, BusinessUpdate {
        average_employees: i64,
        average_monthly_income: i64,
        business_count: i64,
        business_budget: i64,
        rules: BusinessRules,
        business_count_graph_data: GraphSeries,
        average_employees_graph_data: GraphSeries,
        average_monthly_income_graph_data: GraphSeries,
    }
}

view_data! {
    /// Healthcare app view state.
    HealthcareData, HealthcareUpdate {
        age_ranges: AgeRanges,
        births_per_month: i64,
        #[serde(alias = "deaths_per_months")]
        deaths_per_month: i64,
        life_expectancy: i64,
        population: i64,
        used_capacity: i64,
        total_capacity: i64,
        rules: HealthcareRules,
        child_care: CareCapacity,
        adult_care: CareCapacity,
        elder_care: CareCapacity,
        population_graph_data: GraphSeries,
        births_graph_data: GraphSeries,
        deaths_graph_data: GraphSeries,
        life_expectancy_graph_data: GraphSeries,
        hospital_usage_capacity_graph_data: GraphSeries,
    }
}

view_data! {
    /// Welfare app view state.
    WelfareData, WelfareUpdate {
        average_welfare: i64,
        average_unemployed_welfare: i64,
        welfare_budget: i64,
        unemployed_count: i64,
        rules: WelfareRules,
        unemployed_count_graph_data: GraphSeries,
        average_welfare_graph_data: GraphSeries,
        average_unemployed_welfare_graph_data: GraphSeries,
    }
}

/// Full view data of one data-bearing app.
#[derive(Debug, Clone, PartialEq)]
pub enum AppData {
    /// Finance.
    Finance(FinanceData),
    /// Business.
    Business(BusinessData),
    /// Healthcare.
    Healthcare(HealthcareData),
    /// Welfare.
    Welfare(WelfareData),
}

impl AppData {
    /// App this data belongs to.
    pub const fn kind(&self) -> AppKind {
        match self {
            Self::Finance(_) => AppKind::Finance,
            Self::Business(_) => AppKind::Business,
            Self::Healthcare(_) => AppKind::Healthcare,
            Self::Welfare(_) => AppKind::Welfare,
        }
    }

    /// Parses a serialized full data document for `kind`.
    ///
    /// Returns `Ok(None)` for kinds that carry no view data.
    ///
    /// # Errors
    ///
    /// Fails when `raw` is not valid JSON for the kind's data type.
    pub fn parse(kind: AppKind, raw: &str) -> Result<Option<Self>, serde_json::Error> {
        let data = match kind {
            AppKind::Finance => Self::Finance(serde_json::from_str(raw)?),
            AppKind::Business => Self::Business(serde_json::from_str(raw)?),
            AppKind::Healthcare => Self::Healthcare(serde_json::from_str(raw)?),
            AppKind::Welfare => Self::Welfare(serde_json::from_str(raw)?),
            AppKind::Email => return Ok(None),
        };
        Ok(Some(data))
    }
}

/// Incremental view-data push, one variant per data-bearing app.
#[derive(Debug, Clone, PartialEq)]
pub enum AppUpdate {
    /// Finance fields.
    Finance(FinanceUpdate),
    /// Business fields.
    Business(BusinessUpdate),
    /// Healthcare fields.
    Healthcare(HealthcareUpdate),
    /// Welfare fields.
    Welfare(WelfareUpdate),
}

impl AppUpdate {
    /// App this update targets.
    pub const fn kind(&self) -> AppKind {
        match self {
            Self::Finance(_) => AppKind::Finance,
            Self::Business(_) => AppKind::Business,
            Self::Healthcare(_) => AppKind::Healthcare,
            Self::Welfare(_) => AppKind::Welfare,
        }
    }

    /// Wraps the update in the backend push shape.
    ///
    /// # Errors
    ///
    /// Fails only if a field holds a value JSON cannot represent.
    pub fn into_envelope(
        self,
        update_type: Granularity,
    ) -> Result<AppUpdateEnvelope, serde_json::Error> {
        let (app_id, data) = match self {
            Self::Finance(update) => (1, serde_json::to_value(update)?),
            Self::Healthcare(update) => (2, serde_json::to_value(update)?),
            Self::Welfare(update) => (3, serde_json::to_value(update)?),
            Self::Business(update) => (4, serde_json::to_value(update)?),
        };
        Ok(AppUpdateEnvelope {
            app_id,
            update_type,
            data,
        })
    }
}

/// `update_app` push as emitted by the simulation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppUpdateEnvelope {
    /// Backend app id, see [`AppKind::backend_app_id`].
    pub app_id: u8,
    /// Whether the push closes a simulated day or month.
    pub update_type: Granularity,
    /// Partial view data of the app.
    pub data: Value,
}

impl AppUpdateEnvelope {
    /// App addressed by [`Self::app_id`], if it is known.
    pub fn kind(&self) -> Option<AppKind> {
        AppKind::from_backend_app_id(self.app_id)
    }

    /// Decodes [`Self::data`] as the partial data of the addressed app.
    ///
    /// # Errors
    ///
    /// Fails when the app id is unknown or the data does not fit that app's update type.
    pub fn decode(&self) -> Result<AppUpdate, AppUpdateError> {
        let kind = self.kind().ok_or(AppUpdateError::UnknownApp(self.app_id))?;
        let data = self.data.clone();
        let update = match kind {
            AppKind::Finance => serde_json::from_value(data).map(AppUpdate::Finance),
            AppKind::Business => serde_json::from_value(data).map(AppUpdate::Business),
            AppKind::Healthcare => serde_json::from_value(data).map(AppUpdate::Healthcare),
            AppKind::Welfare => serde_json::from_value(data).map(AppUpdate::Welfare),
            AppKind::Email => return Err(AppUpdateError::UnknownApp(self.app_id)),
        };
        update.map_err(|source| AppUpdateError::Data { app: kind, source })
    }
}

/// Errors decoding an [`AppUpdateEnvelope`].
#[derive(Debug, Error)]
pub enum AppUpdateError {
    /// No data-bearing app has this backend id.
    #[error("unknown backend app id {0}")]
    UnknownApp(u8),
    /// The data does not fit the app's update type.
    #[error("invalid update data for `{}`: {source}", .app.name())]
    Data {
        /// Addressed app.
        app: AppKind,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::graph::GraphFilter;

    #[test]
    fn update_overwrites_present_fields_and_keeps_the_rest() {
        let mut data = FinanceData {
            government_balance: 1_000,
            tax_rate: 20,
            spare_budget: 50,
            ..FinanceData::default()
        };

        let update: FinanceUpdate = serde_json::from_value(json!({
            "government_balance": 900,
            "expected_balance": -300,
        }))
        .expect("update");
        update.merge_into(&mut data);

        assert_eq!(data.government_balance, 900);
        assert_eq!(data.expected_balance, -300);
        assert_eq!(data.tax_rate, 20);
        assert_eq!(data.spare_budget, 50);
    }

    #[test]
    fn nested_rules_are_replaced_not_deep_merged() {
        let mut data = WelfareData::default();
        data.rules.cover_food.people_count = 12;
        data.rules.cover_food_unemployed.enabled = true;

        WelfareUpdate {
            rules: Some(WelfareRules {
                cover_food: CoverFoodRule {
                    enabled: true,
                    ..CoverFoodRule::default()
                },
                ..WelfareRules::default()
            }),
            ..WelfareUpdate::default()
        }
        .merge_into(&mut data);

        assert!(data.rules.cover_food.enabled);
        assert_eq!(data.rules.cover_food.people_count, 0);
        assert!(!data.rules.cover_food_unemployed.enabled);
    }

    #[test]
    fn backend_opened_payload_parses_with_field_aliases() {
        let raw = json!({
            "population": 1200,
            "births_per_month": 4,
            "deaths_per_months": 3,
            "life_expectancy": 81,
            "age_ranges": { "0-18": 300, "85+": 20 },
            "child_care": { "budget": 10, "current_capacity": 2, "total_capacity": 8 },
            "rules": { "deny_past_age": { "enabled": true, "maximum_age": 90 } },
        })
        .to_string();

        let Some(AppData::Healthcare(data)) =
            AppData::parse(AppKind::Healthcare, &raw).expect("parse")
        else {
            panic!("expected healthcare data");
        };
        assert_eq!(data.deaths_per_month, 3);
        assert_eq!(data.age_ranges.get("85+"), Some(&20));
        assert_eq!(data.child_care.total_capacity, 8);
        assert_eq!(data.rules.deny_past_age.maximum_age, 90);
        assert!(!data.rules.deny_past_health.enabled);
    }

    #[test]
    fn email_has_no_view_data() {
        assert_eq!(AppData::parse(AppKind::Email, "{}").expect("parse"), None);
        assert!(AppData::parse(AppKind::Finance, "not json").is_err());
    }

    #[test]
    fn backend_push_decodes_by_app_id() {
        let envelope: AppUpdateEnvelope = serde_json::from_value(json!({
            "app_id": 4,
            "update_type": "day",
            "data": {
                "business_count": 7,
                "business_count_graph_data": { "type_id": 0, "one_week": [1.0, 2.0, -1.0] },
            },
        }))
        .expect("envelope");

        assert_eq!(envelope.kind(), Some(AppKind::Business));
        let update = envelope.decode().expect("update");
        let AppUpdate::Business(business) = &update else {
            panic!("expected business update");
        };
        assert_eq!(business.business_count, Some(7));
        assert_eq!(business.average_employees, None);
        assert_eq!(
            business
                .business_count_graph_data
                .as_ref()
                .map(|series| series.bucket(GraphFilter::OneWeek).to_vec()),
            Some(vec![1.0, 2.0])
        );
        assert_eq!(update.kind(), AppKind::Business);
    }

    #[test]
    fn backend_push_with_unknown_app_or_bad_data_is_rejected() {
        let unknown = AppUpdateEnvelope {
            app_id: 9,
            update_type: Granularity::Month,
            data: json!({}),
        };
        assert!(matches!(unknown.decode(), Err(AppUpdateError::UnknownApp(9))));

        let mistyped = AppUpdateEnvelope {
            app_id: 1,
            update_type: Granularity::Day,
            data: json!({ "tax_rate": "high" }),
        };
        assert!(matches!(
            mistyped.decode(),
            Err(AppUpdateError::Data {
                app: AppKind::Finance,
                ..
            })
        ));
    }

    #[test]
    fn envelope_uses_the_backend_app_id_of_each_kind() {
        let updates = [
            AppUpdate::Finance(FinanceUpdate::default()),
            AppUpdate::Business(BusinessUpdate::default()),
            AppUpdate::Healthcare(HealthcareUpdate::default()),
            AppUpdate::Welfare(WelfareUpdate {
                unemployed_count: Some(40),
                ..WelfareUpdate::default()
            }),
        ];
        for update in updates {
            let kind = update.kind();
            let envelope = update.clone().into_envelope(Granularity::Month).expect("envelope");
            assert_eq!(Some(envelope.app_id), kind.backend_app_id());
            assert_eq!(envelope.decode().expect("decode"), update);
        }
    }
}
