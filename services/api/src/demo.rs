use crate::infra::InMemoryDecisionSink;
use antifraud::config::{weighted_cutoff, AppConfig, ConfigError};
use antifraud::error::AppError;
use antifraud::screening::{
    CombinationPolicy, DecisionResult, FraudScreeningService, RuleConfig, TransactionRecord,
    TransactionRequest,
};
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum PolicyArg {
    FirstMatch,
    WeightedSum,
}

impl PolicyArg {
    fn into_policy(self, cutoff: Option<Decimal>) -> Result<CombinationPolicy, ConfigError> {
        match self {
            Self::FirstMatch => Ok(CombinationPolicy::FirstMatch),
            Self::WeightedSum => Ok(CombinationPolicy::WeightedSum {
                cutoff: checked_cutoff(cutoff)?.unwrap_or_else(CombinationPolicy::default_cutoff),
            }),
        }
    }
}

fn checked_cutoff(cutoff: Option<Decimal>) -> Result<Option<Decimal>, ConfigError> {
    cutoff
        .map(|value| weighted_cutoff("--cutoff", value))
        .transpose()
}

/// Apply CLI overrides on top of the configured policy.
fn override_policy(
    configured: CombinationPolicy,
    policy: Option<PolicyArg>,
    cutoff: Option<Decimal>,
) -> Result<CombinationPolicy, ConfigError> {
    match (policy, checked_cutoff(cutoff)?) {
        (Some(policy), cutoff) => policy.into_policy(cutoff),
        (None, Some(cutoff)) => match configured {
            CombinationPolicy::WeightedSum { .. } => Ok(CombinationPolicy::WeightedSum { cutoff }),
            CombinationPolicy::FirstMatch => Ok(configured),
        },
        (None, None) => Ok(configured),
    }
}

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Transaction amount
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) amount: Decimal,
    /// Hour of day the purchase happened (0-23)
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) hour: i64,
    /// Distance from the previous purchase in kilometers
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) distance_km: Decimal,
    /// Transactions already made today
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) transactions_today: i64,
    /// Account age in days
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) account_age_days: i64,
    /// Override the configured combination policy
    #[arg(long, value_enum)]
    pub(crate) policy: Option<PolicyArg>,
    /// Cutoff used with the weighted-sum policy, between 0 and 1 (defaults to 0.5)
    #[arg(long)]
    pub(crate) cutoff: Option<Decimal>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Only run the scenarios under this policy
    #[arg(long, value_enum)]
    pub(crate) policy: Option<PolicyArg>,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let rules = AppConfig::load()?.rules;
    let policy = override_policy(rules.policy, args.policy, args.cutoff)?;
    let rules = rules.with_policy(policy);

    let record = TransactionRecord::new(
        args.amount,
        args.hour,
        args.distance_km,
        args.transactions_today,
        args.account_age_days,
    )?;

    let service = FraudScreeningService::new(rules, Arc::new(InMemoryDecisionSink::default()));
    let decision = service.screen_record(&record);
    let rendered =
        serde_json::to_string_pretty(&decision).map_err(|err| AppError::Io(err.into()))?;
    println!("{rendered}");

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let policies = match args.policy {
        Some(policy) => vec![policy.into_policy(None)?],
        None => vec![CombinationPolicy::FirstMatch, CombinationPolicy::weighted()],
    };

    println!("Antifraud rule engine demo");
    for policy in policies {
        let sink = Arc::new(InMemoryDecisionSink::default());
        let service =
            FraudScreeningService::new(RuleConfig::default().with_policy(policy), sink.clone());

        println!("\nPolicy: {}", policy.label());
        for (label, request) in demo_scenarios() {
            match service.screen(request) {
                Ok(decision) => print_decision(label, &decision),
                Err(err) => println!("- {label:<28} rejected: {err}"),
            }
        }

        let tally = sink.tally();
        println!(
            "Totals: {} blocked | {} approved | {} rejected",
            tally.blocked, tally.approved, tally.rejected
        );
    }

    Ok(())
}

fn print_decision(label: &str, decision: &DecisionResult) {
    println!("- {label:<28} {}", decision.summary());
}

fn demo_scenarios() -> Vec<(&'static str, TransactionRequest)> {
    vec![
        ("high value", scenario(Decimal::new(15_000, 0), 14, 50, 3, 100)),
        ("night burst", scenario(Decimal::new(500, 0), 3, 10, 6, 100)),
        (
            "distant purchase, new account",
            scenario(Decimal::new(200, 0), 14, 850, 1, 15),
        ),
        ("everyday purchase", scenario(Decimal::new(500, 0), 14, 10, 2, 100)),
        (
            "night burst far from home",
            scenario(Decimal::new(300, 0), 1, 700, 9, 5),
        ),
        ("threshold amount", scenario(Decimal::new(10_000, 0), 14, 50, 3, 100)),
        ("out of range hour", scenario(Decimal::new(120, 0), 25, 5, 1, 400)),
    ]
}

fn scenario(
    amount: Decimal,
    hour_of_day: i64,
    distance_km: i64,
    transactions_today: i64,
    account_age_days: i64,
) -> TransactionRequest {
    TransactionRequest {
        amount,
        hour_of_day,
        distance_from_last_purchase_km: Decimal::from(distance_km),
        transactions_today,
        account_age_days,
    }
}
