//! Route leg annotation.
//!
//! Each leg carries the distance (nautical miles) and initial bearing to the
//! next waypoint. Both are directional, so reversing a route always
//! re-annotates from the reversed point order; flipping the leg array would
//! leave every bearing pointing back the way the route came.

use std::sync::Arc;

use crate::models::types::{GeoPoint, Result};
use crate::network::traits::WaypointSource;
use crate::spatial::queries::{bearing_degrees, distance_km, KM_PER_NAUTICAL_MILE};

/// A point supplied by a waypoint source, before annotation.
#[derive(Clone, Debug, PartialEq)]
pub struct Waypoint {
    pub point: GeoPoint,
    pub name: Option<Arc<str>>,
}

impl Waypoint {
    pub fn new(point: GeoPoint, name: Option<&str>) -> Self {
        Self {
            point,
            name: name.map(Into::into),
        }
    }
}

/// A waypoint annotated with the leg that starts at it.
///
/// The final leg of a route has no "next" and carries `0.0` for both fields.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteLeg {
    pub point: GeoPoint,
    pub name: Option<Arc<str>>,
    pub distance_to_next_nautical_miles: f64,
    pub bearing_to_next_degrees: f64,
}

impl RouteLeg {
    pub fn waypoint(&self) -> Waypoint {
        Waypoint {
            point: self.point,
            name: self.name.clone(),
        }
    }
}

/// Annotate an ordered waypoint sequence. Produces exactly one leg per point.
pub fn annotate(points: &[Waypoint]) -> Vec<RouteLeg> {
    points
        .iter()
        .enumerate()
        .map(|(i, waypoint)| {
            let (distance, bearing) = match points.get(i + 1) {
                Some(next) => (
                    distance_km(waypoint.point, next.point) / KM_PER_NAUTICAL_MILE,
                    bearing_degrees(waypoint.point, next.point),
                ),
                None => (0.0, 0.0),
            };

            RouteLeg {
                point: waypoint.point,
                name: waypoint.name.clone(),
                distance_to_next_nautical_miles: distance,
                bearing_to_next_degrees: bearing,
            }
        })
        .collect()
}

/// Reverse travel direction: reverse the points and annotate from scratch.
pub fn reverse(legs: &[RouteLeg]) -> Vec<RouteLeg> {
    let points: Vec<Waypoint> = legs.iter().rev().map(RouteLeg::waypoint).collect();
    annotate(&points)
}

pub fn total_distance_nautical_miles(legs: &[RouteLeg]) -> f64 {
    legs.iter().map(|leg| leg.distance_to_next_nautical_miles).sum()
}

/// A named route whose legs are always derived from its current point order.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotatedRoute {
    pub name: Arc<str>,
    legs: Vec<RouteLeg>,
}

impl AnnotatedRoute {
    pub fn from_waypoints(name: impl Into<Arc<str>>, points: &[Waypoint]) -> Self {
        Self {
            name: name.into(),
            legs: annotate(points),
        }
    }

    /// Fetch a stored route's points and annotate them in stored order.
    pub async fn load(source: &dyn WaypointSource, route_id: &str) -> Result<Self> {
        let points = source.load_waypoints(route_id).await?;
        tracing::debug!(route_id, waypoints = points.len(), "loaded route");
        Ok(Self::from_waypoints(route_id, &points))
    }

    pub fn legs(&self) -> &[RouteLeg] {
        &self.legs
    }

    pub fn waypoints(&self) -> Vec<Waypoint> {
        self.legs.iter().map(RouteLeg::waypoint).collect()
    }

    pub fn reversed(&self) -> Self {
        Self {
            name: self.name.clone(),
            legs: reverse(&self.legs),
        }
    }

    pub fn total_distance_nautical_miles(&self) -> f64 {
        total_distance_nautical_miles(&self.legs)
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn chesapeake() -> Vec<Waypoint> {
        vec![
            Waypoint::new(GeoPoint::new(38.9784, -76.4922), Some("Annapolis")),
            Waypoint::new(GeoPoint::new(38.5557, -76.4147), Some("Cove Point")),
            Waypoint::new(GeoPoint::new(37.9968, -76.0469), Some("Smith Point")),
            Waypoint::new(GeoPoint::new(36.9263, -76.0166), None),
        ]
    }

    #[test]
    fn test_annotate_empty() {
        assert!(annotate(&[]).is_empty());
    }

    #[test]
    fn test_annotate_single_point() {
        let legs = annotate(&[Waypoint::new(GeoPoint::new(10.0, 20.0), Some("Solo"))]);

        assert_eq!(legs.len(), 1);
        assert_eq!(legs[0].distance_to_next_nautical_miles, 0.0);
        assert_eq!(legs[0].bearing_to_next_degrees, 0.0);
        assert_eq!(legs[0].name.as_deref(), Some("Solo"));
    }

    #[test]
    fn test_annotate_one_leg_per_point() {
        let points = chesapeake();
        let legs = annotate(&points);

        assert_eq!(legs.len(), points.len());
        for (i, leg) in legs.iter().enumerate().take(points.len() - 1) {
            let expected = distance_km(points[i].point, points[i + 1].point) / 1.852;
            assert_eq!(leg.distance_to_next_nautical_miles, expected);
            assert_eq!(
                leg.bearing_to_next_degrees,
                bearing_degrees(points[i].point, points[i + 1].point)
            );
        }

        let last = legs.last().unwrap();
        assert_eq!(last.distance_to_next_nautical_miles, 0.0);
        assert_eq!(last.bearing_to_next_degrees, 0.0);
    }

    #[test]
    fn test_annotate_due_north_one_degree() {
        let legs = annotate(&[
            Waypoint::new(GeoPoint::new(0.0, 0.0), None),
            Waypoint::new(GeoPoint::new(1.0, 0.0), None),
        ]);

        // One degree of latitude is ~60 nautical miles
        assert_relative_eq!(legs[0].distance_to_next_nautical_miles, 60.04, epsilon = 0.01);
        assert_relative_eq!(legs[0].bearing_to_next_degrees, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_reverse_recomputes_instead_of_flipping() {
        let points = chesapeake();
        let legs = annotate(&points);

        let mut reversed_points = points.clone();
        reversed_points.reverse();

        assert_eq!(reverse(&legs), annotate(&reversed_points));
    }

    #[test]
    fn test_reverse_turns_bearings_around() {
        let legs = annotate(&chesapeake());
        let reversed = reverse(&legs);

        // Annapolis -> Cove Point heads roughly south; the reversed final
        // leg (Cove Point -> Annapolis) must head roughly north.
        assert!((90.0..270.0).contains(&legs[0].bearing_to_next_degrees));
        let back = &reversed[reversed.len() - 2];
        assert!(back.bearing_to_next_degrees < 90.0 || back.bearing_to_next_degrees > 270.0);

        // The stale last-leg zeros move with recomputation, not with the flip
        assert_eq!(reversed[0].name, None);
        assert!(reversed[0].distance_to_next_nautical_miles > 0.0);
        assert_eq!(reversed.last().unwrap().distance_to_next_nautical_miles, 0.0);
    }

    struct FixedSource;

    impl WaypointSource for FixedSource {
        fn load_waypoints<'a>(
            &'a self,
            route_id: &'a str,
        ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Vec<Waypoint>>> + Send + 'a>>
        {
            Box::pin(async move {
                match route_id {
                    "bay" => Ok(chesapeake()),
                    _ => Err(crate::CoreError::Storage(format!("no route {route_id}"))),
                }
            })
        }
    }

    #[tokio::test]
    async fn test_load_from_source() {
        let route = AnnotatedRoute::load(&FixedSource, "bay").await.unwrap();
        assert_eq!(&*route.name, "bay");
        assert_eq!(route, AnnotatedRoute::from_waypoints("bay", &chesapeake()));

        assert!(AnnotatedRoute::load(&FixedSource, "missing").await.is_err());
    }

    #[test]
    fn test_double_reverse_is_identity() {
        let legs = annotate(&chesapeake());
        assert_eq!(reverse(&reverse(&legs)), legs);
    }

    #[test]
    fn test_total_distance_is_direction_independent() {
        let route = AnnotatedRoute::from_waypoints("Bay run", &chesapeake());
        let back = route.reversed();

        assert_eq!(route.len(), 4);
        assert_relative_eq!(
            route.total_distance_nautical_miles(),
            back.total_distance_nautical_miles(),
            max_relative = 1e-12
        );
        assert_eq!(back.reversed(), route);
        assert_eq!(route.waypoints(), chesapeake());
    }
}
