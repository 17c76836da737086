pub mod error;
pub mod time_series;
pub mod ccf;


pub use error::CcfError;
pub use time_series::{julian_date, LightCurve, Observation};
pub use ccf::{
    compute_ccf,
    CcfConfig,
    CcfCurve,
    CcfEngine,
    CorrelationStats,
    ExecutionMode,
    LagCorrelation,
    LagSet,
    Workspace,
};
