use prometheus::register_int_counter_vec;
use prometheus::IntCounterVec;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

// sqlx logs every statement at info
const DEFAULT_FILTER: &str = "info,sqlx=warn,tower_http=debug";

lazy_static! {
    pub static ref QUIZ_QUESTIONS_CNTR: IntCounterVec = register_int_counter_vec!(
        "quiz_questions_served_total",
        "Number of questions handed out by the quiz endpoint",
        &["category"]
    )
    .unwrap();
}

/// `category` is "all" for quizzes spanning every category.
pub fn record_quiz_question(category: &str) {
    QUIZ_QUESTIONS_CNTR.with_label_values(&[category]).inc();
}

/// Filter comes from `LOG_LEVEL` (EnvFilter syntax), span enter/exit events are
/// switched on with `INCLUDE_SPAN_EVENTS=true`.
pub fn init_tracing() {
    let span_events = if std::env::var("INCLUDE_SPAN_EVENTS")
        .is_ok_and(|value| value.eq_ignore_ascii_case("true"))
    {
        FmtSpan::ENTER | FmtSpan::EXIT
    } else {
        FmtSpan::NONE
    };
    let fmt_layer = fmt::layer().with_target(true).with_span_events(span_events);
    let filter_layer =
        EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
