pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use simulation::states::{BodyId, DynamicBody, KinematicSatellite, NVec3, Presentation, System};
pub use simulation::forces::{pairwise_force, ForceLaw, ForceSet, NewtonianGravity};
pub use simulation::integrator::{compute_accelerations, prime_accelerations, verlet_integrator};
pub use simulation::satellites::{place_satellites, update_satellites};
pub use simulation::trail::{record_trails, Trail};
pub use simulation::engine::{advance, Engine};
pub use simulation::params::Parameters;
pub use simulation::scenario::Scenario;
pub use simulation::diagnostics::{readout, readouts, BodyReadout};

pub use configuration::config::{load_scenario, ScenarioConfig, ParametersConfig, BodyConfig, SatelliteConfig, CentralBodyConfig};
pub use configuration::error::{ConfigError, ConfigResult};

pub use benchmark::benchmark::{bench_gravity, bench_advance, BenchRow};
