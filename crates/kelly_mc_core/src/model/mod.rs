mod results;
mod setup;

pub use results::{
    AnalyticsResult, DrawdownStats, ReturnStats, RiskStats, TerminalWealthStats,
    TrajectoryEnsemble,
};
pub use setup::{Scenario, Setup};
