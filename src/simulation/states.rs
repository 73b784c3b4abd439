//! Core state types for the solar-system simulation.
//!
//! Defines the body registry:
//! - `DynamicBody`        bodies moved by N-body gravity
//! - `KinematicSatellite` moons placed on a closed-form circle around a parent
//! - `System`             both lists plus the current simulation time `t`
//!
//! Satellites refer to their parent through a `BodyId` index into
//! `System::bodies`, never through an owning link.

use nalgebra::Vector3;

use super::trail::Trail;

pub type NVec3 = Vector3<f64>;

/// Offset of a satellite from its parent: `radius * (cos θ, 0, sin θ)`.
/// The orbit always lies in the parent's horizontal (x-z) plane.
pub fn orbit_offset(radius: f64, angle: f64) -> NVec3 {
    let (sin, cos) = angle.sin_cos();
    NVec3::new(radius * cos, 0.0, radius * sin)
}

/// Index of a dynamic body inside `System::bodies`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub usize);

/// Display-only hints handed through to whatever draws the bodies.
/// Physics never reads these.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Presentation {
    pub rotation_factor: f64, // spin rate relative to Earth, sign gives direction
    pub axial_tilt_deg: f64, // cosmetic tilt, does not incline the orbit
    pub visual_radius: f64, // draw radius, unrelated to physical size
    pub dwarf: bool, // dwarf planet, drawn differently
}

#[derive(Debug, Clone)]
pub struct DynamicBody {
    pub name: String,
    pub m: f64, // mass, 0 means "never accelerates"
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub a: NVec3, // acceleration from the last completed step
    pub trail: Trail, // sampled past positions
    pub presentation: Presentation,
}

impl DynamicBody {
    /// Body at rest with zero stored acceleration and an empty trail of `max_trail_points`.
    pub fn new(name: impl Into<String>, m: f64, x: NVec3, v: NVec3, max_trail_points: usize) -> Self {
        Self {
            name: name.into(),
            m,
            x,
            v,
            a: NVec3::zeros(),
            trail: Trail::new(max_trail_points),
            presentation: Presentation::default(),
        }
    }

    pub fn with_presentation(mut self, presentation: Presentation) -> Self {
        self.presentation = presentation;
        self
    }
}

#[derive(Debug, Clone)]
pub struct KinematicSatellite {
    pub name: String,
    pub m: f64, // informational only
    pub parent: BodyId, // fixed at creation
    pub orbit_radius: f64, // distance from the parent
    pub orbit_speed: f64, // angular rate in rad per time unit, signed
    pub angle: f64, // current orbit angle, unwrapped
    pub x: NVec3, // world position, derived from the parent
    pub trail: Trail,
    pub presentation: Presentation,
}

impl KinematicSatellite {
    /// Satellite at angle 0. Its world position is filled in when it is
    /// attached to a `System`.
    pub fn new(
        name: impl Into<String>,
        m: f64,
        parent: BodyId,
        orbit_radius: f64,
        orbit_speed: f64,
        max_trail_points: usize,
    ) -> Self {
        Self {
            name: name.into(),
            m,
            parent,
            orbit_radius,
            orbit_speed,
            angle: 0.0,
            x: NVec3::zeros(),
            trail: Trail::new(max_trail_points),
            presentation: Presentation::default(),
        }
    }

    pub fn with_presentation(mut self, presentation: Presentation) -> Self {
        self.presentation = presentation;
        self
    }

    /// Offset from the parent at the current angle
    pub fn offset(&self) -> NVec3 {
        orbit_offset(self.orbit_radius, self.angle)
    }
}

#[derive(Debug, Clone, Default)]
pub struct System {
    pub bodies: Vec<DynamicBody>, // index 0 is the central mass by convention
    pub satellites: Vec<KinematicSatellite>, // flat list, each names its parent
    pub t: f64, // time
}

impl System {
    pub fn new(bodies: Vec<DynamicBody>) -> Self {
        Self {
            bodies,
            satellites: Vec::new(),
            t: 0.0,
        }
    }

    pub fn body(&self, id: BodyId) -> Option<&DynamicBody> {
        self.bodies.get(id.0)
    }

    /// The dominant mass, index 0
    pub fn central(&self) -> Option<&DynamicBody> {
        self.bodies.first()
    }

    /// Look up a dynamic body by name
    pub fn find(&self, name: &str) -> Option<BodyId> {
        self.bodies.iter().position(|b| b.name == name).map(BodyId)
    }

    pub fn find_satellite(&self, name: &str) -> Option<&KinematicSatellite> {
        self.satellites.iter().find(|s| s.name == name)
    }

    /// Satellites owned by `parent`, in creation order
    pub fn satellites_of(&self, parent: BodyId) -> impl Iterator<Item = &KinematicSatellite> + '_ {
        self.satellites.iter().filter(move |s| s.parent == parent)
    }

    /// Register a satellite under an existing parent and place it on its
    /// circle at the current angle. Returns `false` and leaves the system
    /// untouched if the parent index is out of range.
    pub fn attach_satellite(&mut self, mut satellite: KinematicSatellite) -> bool {
        let Some(parent) = self.bodies.get(satellite.parent.0) else {
            return false;
        };
        satellite.x = parent.x + satellite.offset();
        self.satellites.push(satellite);
        true
    }
}
