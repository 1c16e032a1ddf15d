//! Business-cycle synchronization between two annual series.
//!
//! Pure math library with no I/O. Cyclical components are z-normalized,
//! joined on year under an explicit [`FillPolicy`], and compared through
//! global, rolling and period-sliced Pearson correlations.

mod align;
mod config;
mod correlation;
mod error;
mod normalize;
mod period;
mod result;

pub use align::{AlignedPair, FillPolicy, align};
pub use config::SyncConfig;
pub use correlation::{pearson, rolling_correlation};
pub use error::SyncError;
pub use normalize::z_normalize;
pub use period::{Period, PeriodCorrelation, PeriodSet, period_correlations};
pub use result::SyncResult;
