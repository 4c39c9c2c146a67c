use bevy::prelude::*;

use crate::section::{Section, SectionEntered};
use crate::vehicle::{Car, DriveInput, VehicleState};

/// Proximity tuning shared by every zone
#[derive(Resource, Clone, Copy, Debug)]
pub struct ZoneSettings {
    /// Planar distance under which a zone counts as active
    pub activation_radius: f32,
}

impl Default for ZoneSettings {
    fn default() -> Self {
        Self {
            activation_radius: 4.0,
        }
    }
}

/// A fixed spot on the map that opens a panel
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerZone {
    pub center: Vec3,
    pub label: &'static str,
    pub subtext: &'static str,
    pub color: Color,
    pub section: Section,
}

impl TriggerZone {
    /// Distance from `point` to the zone center, ignoring height
    pub fn planar_distance(&self, point: Vec3) -> f32 {
        Vec2::new(self.center.x - point.x, self.center.z - point.z).length()
    }

    pub fn contains(&self, point: Vec3, radius: f32) -> bool {
        self.planar_distance(point) < radius
    }
}

/// All zones in scan order, with their derived active flags
#[derive(Resource, Debug, Clone)]
pub struct TriggerZones {
    zones: Vec<TriggerZone>,
    active: Vec<bool>,
}

impl TriggerZones {
    pub fn new(zones: Vec<TriggerZone>) -> Self {
        let active = vec![false; zones.len()];
        Self { zones, active }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TriggerZone, bool)> {
        self.zones.iter().zip(self.active.iter().copied())
    }

    pub fn get(&self, index: usize) -> Option<&TriggerZone> {
        self.zones.get(index)
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active.get(index).copied().unwrap_or(false)
    }

    /// Recomputes every active flag; returns true when any flag changed.
    pub fn refresh(&mut self, vehicle: Vec3, radius: f32) -> bool {
        let mut changed = false;
        for (zone, active) in self.zones.iter().zip(self.active.iter_mut()) {
            let now = zone.contains(vehicle, radius);
            changed |= now != *active;
            *active = now;
        }
        changed
    }

    /// Nearest zone within `radius`; equal distances keep the earlier zone.
    pub fn nearest(&self, vehicle: Vec3, radius: f32) -> Option<&TriggerZone> {
        let mut best: Option<(&TriggerZone, f32)> = None;
        for zone in &self.zones {
            let distance = zone.planar_distance(vehicle);
            if distance >= radius {
                continue;
            }
            if best.is_none_or(|(_, closest)| distance < closest) {
                best = Some((zone, distance));
            }
        }
        best.map(|(zone, _)| zone)
    }
}

impl Default for TriggerZones {
    fn default() -> Self {
        Self::new(vec![
            TriggerZone {
                center: Vec3::new(-20.0, 0.0, -20.0),
                label: "About",
                subtext: "Who I am",
                color: Color::srgb(0.25, 0.55, 0.95),
                section: Section::About,
            },
            TriggerZone {
                center: Vec3::new(20.0, 0.0, -20.0),
                label: "Skills",
                subtext: "What I work with",
                color: Color::srgb(0.3, 0.8, 0.45),
                section: Section::Skills,
            },
            TriggerZone {
                center: Vec3::new(0.0, 0.0, 25.0),
                label: "Contact",
                subtext: "Say hello",
                color: Color::srgb(0.95, 0.75, 0.2),
                section: Section::Contact,
            },
            TriggerZone {
                center: Vec3::new(-28.0, 0.0, 12.0),
                label: "Video Studio",
                subtext: "Animate a picture",
                color: Color::srgb(0.9, 0.3, 0.55),
                section: Section::VideoStudio,
            },
            TriggerZone {
                center: Vec3::new(28.0, 0.0, 12.0),
                label: "Image Studio",
                subtext: "Edit a picture with words",
                color: Color::srgb(0.6, 0.4, 0.95),
                section: Section::ImageStudio,
            },
        ])
    }
}

/// Updates which zones the car is inside
pub fn update_zone_activity(
    car_query: Query<&VehicleState, With<Car>>,
    mut zones: ResMut<TriggerZones>,
    settings: Res<ZoneSettings>,
) {
    let Ok(car) = car_query.single() else {
        return;
    };

    // Only flag the resource when a zone actually flipped
    if zones
        .bypass_change_detection()
        .refresh(car.position, settings.activation_radius)
    {
        zones.set_changed();
    }
}

/// Turns an interact press into a `SectionEntered` message
pub fn enter_nearest_zone(
    mut car_query: Query<(&VehicleState, &mut DriveInput), With<Car>>,
    zones: Res<TriggerZones>,
    settings: Res<ZoneSettings>,
    mut writer: MessageWriter<SectionEntered>,
) {
    let Ok((car, mut input)) = car_query.single_mut() else {
        return;
    };

    if !input.interact_pressed {
        return;
    }
    input.interact_pressed = false;

    if let Some(zone) = zones.nearest(car.position, settings.activation_radius) {
        writer.write(SectionEntered {
            section: zone.section,
        });
    } else {
        debug!("interact pressed outside every zone");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(x: f32, z: f32, section: Section) -> TriggerZone {
        TriggerZone {
            center: Vec3::new(x, 0.0, z),
            label: "zone",
            subtext: "",
            color: Color::WHITE,
            section,
        }
    }

    #[test]
    fn center_is_active_and_just_outside_is_not() {
        let radius = ZoneSettings::default().activation_radius;
        let mut zones = TriggerZones::new(vec![zone(10.0, 5.0, Section::About)]);

        zones.refresh(Vec3::new(10.0, 0.0, 5.0), radius);
        assert!(zones.is_active(0));

        zones.refresh(Vec3::new(10.0 + radius + 1e-3, 0.0, 5.0), radius);
        assert!(!zones.is_active(0));
    }

    #[test]
    fn height_is_ignored() {
        let zones = TriggerZones::new(vec![zone(0.0, 0.0, Section::About)]);
        let zone = zones.get(0).expect("zone");
        assert!(zone.contains(Vec3::new(0.0, 50.0, 0.0), 4.0));
    }

    #[test]
    fn refresh_reports_changes_only() {
        let mut zones = TriggerZones::new(vec![zone(0.0, 0.0, Section::About)]);
        assert!(zones.refresh(Vec3::ZERO, 4.0));
        assert!(!zones.refresh(Vec3::new(1.0, 0.0, 0.0), 4.0));
        assert!(zones.refresh(Vec3::new(9.0, 0.0, 0.0), 4.0));
    }

    #[test]
    fn nearest_picks_closest_zone_in_range() {
        let zones = TriggerZones::new(vec![
            zone(0.0, 0.0, Section::About),
            zone(3.0, 0.0, Section::Skills),
        ]);

        let hit = zones.nearest(Vec3::new(2.0, 0.0, 0.0), 4.0).expect("in range");
        assert_eq!(hit.section, Section::Skills);
    }

    #[test]
    fn ties_go_to_the_first_zone() {
        let zones = TriggerZones::new(vec![
            zone(-1.0, 0.0, Section::Contact),
            zone(1.0, 0.0, Section::ImageStudio),
        ]);

        let hit = zones.nearest(Vec3::ZERO, 4.0).expect("in range");
        assert_eq!(hit.section, Section::Contact);
    }

    #[test]
    fn nothing_in_range() {
        let zones = TriggerZones::default();
        assert!(zones.nearest(Vec3::ZERO, 4.0).is_none());
    }

    #[test]
    fn default_zones_are_spaced_beyond_twice_the_radius() {
        let zones = TriggerZones::default();
        let radius = ZoneSettings::default().activation_radius;
        let all: Vec<_> = zones.iter().map(|(zone, _)| zone.clone()).collect();

        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert!(a.planar_distance(b.center) > 2.0 * radius);
            }
        }
    }
}
