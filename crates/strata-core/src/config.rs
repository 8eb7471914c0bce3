/// Engine-wide configuration for Strata.
#[derive(Debug, Default)]
pub struct Config {
    pub benchmark: BenchmarkMode,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BenchmarkMode {
    /// Benchmarking is disabled
    #[default]
    Off,
    /// Benchmarking is enabled, and can be viewed using an in-process viewer
    On,
    /// Benchmarking is enabled, and can be viewed using external tools such as
    /// 'puffin_viewer'
    WithWebserver,
}

impl Config {
    /// Apply the benchmark mode by switching profiling on and, when requested,
    /// starting the puffin HTTP server.
    #[cfg(feature = "profiling")]
    pub fn apply(&self) {
        use crate::profiling::{ProfilingBackend, init_profiling};

        match self.benchmark {
            BenchmarkMode::Off => puffin::set_scopes_on(false),
            BenchmarkMode::On => puffin::set_scopes_on(true),
            BenchmarkMode::WithWebserver => init_profiling(ProfilingBackend::PuffinHttp),
        }
    }

    #[cfg(not(feature = "profiling"))]
    pub fn apply(&self) {
        if self.benchmark != BenchmarkMode::Off {
            tracing::warn!("benchmark mode requested but the `profiling` feature is disabled");
        }
    }
}
