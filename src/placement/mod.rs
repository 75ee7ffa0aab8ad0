//! Procedural placement of static decoration
//!
//! - `zones`: regions of the ground plane that must stay clear
//! - `sampler`: rejection-sampled, spaced placement points
//! - `cluster`: bouquet clusters built on those points
//! - `scatter`: unspaced floor passes (tank reef, shells, gravel, seaweed)

pub mod cluster;
pub mod sampler;
pub mod scatter;
pub mod zones;

pub use cluster::{Bouquet, BouquetProfile, Cluster, ClusterPlacer, ClusterProfile, DecorativeElement, FanPlane, ShadowDecal};
pub use sampler::{PlacementPoint, PointSampler, SampleOutcome, SamplerParams, SamplerProfile};
pub use scatter::{DecoParams, GravelParams, ScatterArea, ScatterReport, SeaweedParams, TankReefParams};
pub use zones::{Annulus, ExclusionZone, FloorMask, LobbyHallZone, NoExclusion, ProtectedMargins};
