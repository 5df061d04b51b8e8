//! The `Route` polyline.

use rd_core::Position;

use crate::{RouteError, RouteResult};

/// An ordered, non-empty sequence of positions.
///
/// Consecutive points may coincide (zero-length segments) and a single-point
/// route is a valid stationary path.  Cumulative planar lengths are computed
/// once at construction so interpolation is a binary search, not a walk.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    points:     Vec<Position>,
    /// `cumulative[i]` = planar length from `points[0]` to `points[i]`.
    cumulative: Vec<f64>,
}

impl Route {
    /// Build a route from `points`.
    ///
    /// # Errors
    ///
    /// [`RouteError::Empty`] for an empty input, [`RouteError::NonFinite`]
    /// if any coordinate is NaN or infinite.
    pub fn new(points: Vec<Position>) -> RouteResult<Self> {
        if points.is_empty() {
            return Err(RouteError::Empty);
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(RouteError::NonFinite { index });
        }
        Ok(Self::from_valid(points))
    }

    /// A stationary single-point route.
    pub fn point(at: Position) -> Self {
        Self::from_valid(vec![at])
    }

    /// The two-point straight line `[start, end]`.
    pub fn straight(start: Position, end: Position) -> Self {
        Self::from_valid(vec![start, end])
    }

    fn from_valid(points: Vec<Position>) -> Self {
        let mut cumulative = Vec::with_capacity(points.len());
        let mut acc = 0.0;
        cumulative.push(acc);
        for pair in points.windows(2) {
            acc += pair[0].planar_distance(pair[1]);
            cumulative.push(acc);
        }
        Self { points, cumulative }
    }

    #[inline]
    pub fn points(&self) -> &[Position] {
        &self.points
    }

    #[inline]
    pub fn first(&self) -> Position {
        self.points[0]
    }

    #[inline]
    pub fn last(&self) -> Position {
        self.points[self.points.len() - 1]
    }

    /// Number of points (always ≥ 1).
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Total planar length in degree units.
    #[inline]
    pub fn total_length(&self) -> f64 {
        self.cumulative[self.cumulative.len() - 1]
    }

    /// `true` if the route has no extent: a single point, or only
    /// coincident points.  Vehicles arrive on such routes immediately.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.total_length() <= 0.0
    }

    #[inline]
    pub(crate) fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }
}

impl TryFrom<Vec<Position>> for Route {
    type Error = RouteError;

    fn try_from(points: Vec<Position>) -> RouteResult<Self> {
        Route::new(points)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Route {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.points.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Route {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let points = Vec::<Position>::deserialize(deserializer)?;
        Route::new(points).map_err(serde::de::Error::custom)
    }
}
