//! Advisor mail written in response to simulation data.
//!
//! Two advisors watch the app data: the finance advisor warns when next month's expected balance
//! drops below a 30% reserve of budget spending, and the welfare advisor reports unemployment.
//! [`AdvisorDesk`] remembers what was last reported so a condition is mailed once when it starts,
//! not on every update.

use desktop_app_contract::{Email, FinanceData, Severity};

use crate::app_data::AppDataStore;

/// Sender of budget mail.
pub const FINANCE_ADVISOR: &str = "Tarun";
/// Sender of unemployment mail.
pub const WELFARE_ADVISOR: &str = "Ralph";
/// Share of budget spending that should stay in reserve, in percent.
pub const SAFE_BUDGET_PERCENT: i64 = 30;
/// Unemployment rate at or above which the welfare advisor writes.
pub const HIGH_UNEMPLOYMENT_PERCENT: f64 = 10.0;
/// Rise of the unemployment rate between two updates treated as a business going bust.
pub const BUSINESS_BUST_JUMP_PERCENT: f64 = 5.0;

/// Monthly spending of the welfare, business and healthcare budgets combined.
pub fn total_budget_spending(finance: &FinanceData) -> i64 {
    finance.welfare_budget + finance.business_budget + finance.healthcare_budget
}

/// Reserve to keep for `total_budget_spending`, rounded up.
pub fn safe_reserve(total_budget_spending: i64) -> i64 {
    (total_budget_spending.max(0) * SAFE_BUDGET_PERCENT + 99) / 100
}

/// Amount to save so that `expected_balance` reaches the safe reserve; `0` once it does.
pub fn safe_budget(expected_balance: i64, total_budget_spending: i64) -> i64 {
    (safe_reserve(total_budget_spending) - expected_balance).max(0)
}

/// Unemployment rate in percent, rounded to one decimal. `None` without a population.
pub fn unemployment_rate(unemployed_count: i64, population: i64) -> Option<f64> {
    if population <= 0 {
        return None;
    }
    let per_mille = (unemployed_count as f64 * 1000.0 / population as f64).round();
    Some(per_mille / 10.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Finance advisor's view of next month's balance.
pub enum BudgetOutlook {
    /// At or above the safe reserve.
    #[default]
    Healthy,
    /// Not negative, but below the safe reserve.
    BelowSafeZone,
    /// Negative.
    Crisis,
}

/// Classifies `expected_balance` against the reserve for `total_budget_spending`.
pub fn budget_outlook(expected_balance: i64, total_budget_spending: i64) -> BudgetOutlook {
    if expected_balance < 0 {
        BudgetOutlook::Crisis
    } else if expected_balance < safe_reserve(total_budget_spending) {
        BudgetOutlook::BelowSafeZone
    } else {
        BudgetOutlook::Healthy
    }
}

/// Mail announcing that next month's balance will be negative.
pub fn expected_crisis(
    username: &str,
    safe_budget: i64,
    expected_balance: i64,
    total_budget_spending: i64,
) -> Email {
    let break_even = total_budget_spending - expected_balance;
    Email {
        title: "EXPECTED CRISIS".to_string(),
        content: format!(
            "{username}! I have done some calculations and based on our statistics I estimate \
             that we are going to experience a financial crash next month and our budget is going \
             to fall to -${deficit}. You need to save at least ${break_even} to gain a digit above \
             $0.\n\n\
             To gain a safe budget with {SAFE_BUDGET_PERCENT}% spare you need to save at least \
             ${safe_budget}.\n\n\
             You can save by either increasing tax rates or reducing budget allocations.\n\n\
             If action isn't taken, the damage could be irreversible,\n{FINANCE_ADVISOR}.",
            deficit = -expected_balance,
        ),
        sender: FINANCE_ADVISOR.to_string(),
        severity: Severity::Error,
    }
}

/// Mail warning that next month's balance is below the safe reserve.
pub fn expected_balance(
    username: &str,
    total_budget_spending: i64,
    safe_budget: i64,
    expected_balance: i64,
) -> Email {
    Email {
        title: "Expected Balance Below Safe Zone".to_string(),
        content: format!(
            "Hello {username},\n\n\
             I have been doing some digging and I wanted to give you a quick heads up. The \
             expected balance next month is ${expected_balance}.\n\n\
             It is generally good practice to keep at least {SAFE_BUDGET_PERCENT}% of our expected \
             budget spending for some leeway in case of miscalculation.\n\
             Our estimated budget spending next month is ${total_budget_spending}. This means that \
             you need to save at least ${safe_budget} to maintain a safe budget.\n\n\
             You can save by either increasing tax rates or reducing budget allocations.\n\n\
             Thanks for reading and good luck,\n{FINANCE_ADVISOR}."
        ),
        sender: FINANCE_ADVISOR.to_string(),
        severity: Severity::Warning,
    }
}

/// Mail reporting a high unemployment rate.
pub fn high_unemployment(username: &str, percent: f64, unemployed_count: i64) -> Email {
    Email {
        title: "High Unemployment Rate".to_string(),
        content: format!(
            "Hi {username}, hope you're doing well. It has been brought to my attention that the \
             unemployment rate for the country needs to be addressed, as it currently sits at \
             {unemployed_count} people ({percent}%).\n\n\
             This was likely caused by a large corporation going bust. Ensure that you cover \
             expenses for these people to keep them healthy while they seek new employment.\n\n\
             Many thanks, {WELFARE_ADVISOR}"
        ),
        sender: WELFARE_ADVISOR.to_string(),
        severity: Severity::Warning,
    }
}

/// Mail reporting a sudden jump in unemployment.
pub fn business_bust(username: &str, percent: f64, unemployed_count: i64) -> Email {
    Email {
        title: "Huge business has gone bust!".to_string(),
        content: format!(
            "Hello {username}, you need to act ASAP! A large business has just gone bust and \
             {unemployed_count} people ({percent}%) are now unemployed. Fund expenses for as many \
             people as you can while they seek new employment."
        ),
        sender: WELFARE_ADVISOR.to_string(),
        severity: Severity::Error,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Last conditions reported by the advisors.
pub struct AdvisorDesk {
    outlook: BudgetOutlook,
    unemployment_percent: Option<f64>,
}

impl AdvisorDesk {
    /// Budget outlook last reported.
    pub fn outlook(&self) -> BudgetOutlook {
        self.outlook
    }

    /// Writes mail for every condition that started since the previous review.
    pub fn review(&mut self, username: &str, data: &AppDataStore) -> Vec<Email> {
        let mut mail = Vec::new();

        if let Some(finance) = &data.finance {
            let spending = total_budget_spending(finance);
            let expected = finance.expected_balance;
            let outlook = budget_outlook(expected, spending);
            if outlook != self.outlook {
                self.outlook = outlook;
                let needed = safe_budget(expected, spending);
                match outlook {
                    BudgetOutlook::Crisis => {
                        mail.push(expected_crisis(username, needed, expected, spending));
                    }
                    BudgetOutlook::BelowSafeZone => {
                        mail.push(expected_balance(username, spending, needed, expected));
                    }
                    BudgetOutlook::Healthy => {}
                }
            }
        }

        let rate = match (&data.welfare, &data.healthcare) {
            (Some(welfare), Some(healthcare)) => {
                unemployment_rate(welfare.unemployed_count, healthcare.population)
                    .map(|percent| (percent, welfare.unemployed_count))
            }
            _ => None,
        };
        if let Some((percent, unemployed)) = rate {
            let previous = self.unemployment_percent.replace(percent);
            let jumped =
                previous.is_some_and(|before| percent - before >= BUSINESS_BUST_JUMP_PERCENT);
            let crossed = percent >= HIGH_UNEMPLOYMENT_PERCENT
                && previous.map_or(true, |before| before < HIGH_UNEMPLOYMENT_PERCENT);
            if jumped {
                mail.push(business_bust(username, percent, unemployed));
            } else if crossed {
                mail.push(high_unemployment(username, percent, unemployed));
            }
        }

        mail
    }
}
