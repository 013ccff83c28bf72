use crate::core::{Coordinates, LandingProfile, LandingType, LaunchInfo};

/// Atlantic droneship recovery zone.
pub const ATLANTIC_ASDS: Coordinates = Coordinates::new(28.5, -74.5);
/// Vandenberg SLC-4E.
pub const VANDENBERG_RTLS: Coordinates = Coordinates::new(34.732, -120.572);
/// Cape Canaveral / KSC landing zones.
pub const CAPE_RTLS: Coordinates = Coordinates::new(28.56, -80.57);

pub const WEST_COAST_BOOSTER: &str = "B10xx (West Coast)";
pub const DEFAULT_BOOSTER: &str = "B1083 (Flight 12)";

const DRONESHIP_MISSIONS: [&str; 3] = ["starlink", "rideshare", "transporter"];
const WEST_COAST_PADS: [&str; 2] = ["vandenberg", "vsfb"];

fn is_west_coast(pad_name: &str) -> bool {
    let pad = pad_name.to_lowercase();
    WEST_COAST_PADS.iter().any(|p| pad.contains(p))
}

/// First match wins: droneship missions, then West Coast pads, then the Cape.
pub fn pick_landing_profile(mission_name: &str, pad_name: &str) -> LandingProfile {
    let mission = mission_name.to_lowercase();

    if DRONESHIP_MISSIONS.iter().any(|m| mission.contains(m)) {
        return LandingProfile {
            landing_type: LandingType::Asds,
            coordinates: ATLANTIC_ASDS,
        };
    }

    let coordinates = if is_west_coast(pad_name) {
        VANDENBERG_RTLS
    } else {
        CAPE_RTLS
    };
    LandingProfile {
        landing_type: LandingType::Rtls,
        coordinates,
    }
}

/// Landing profile for a fetched launch; RTLS uses the real pad coordinates when known.
pub fn resolve_landing_profile(launch: &LaunchInfo) -> LandingProfile {
    let mut profile = pick_landing_profile(&launch.mission, &launch.pad_name);
    if profile.landing_type == LandingType::Rtls {
        if let Some(pad) = launch.pad_coordinates() {
            profile.coordinates = pad;
        }
    }
    profile
}

pub fn guess_booster(pad_name: &str) -> &'static str {
    if is_west_coast(pad_name) {
        WEST_COAST_BOOSTER
    } else {
        DEFAULT_BOOSTER
    }
}
