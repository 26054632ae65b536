use model::{geometry::Coordinate, submission::MissionSubmission, user::User};
use utility::id::Id;

/// Reasons a submission is rejected before anything is written.
///
/// Messages only ever name positions inside the payload, never coordinates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("owner user id {0} does not identify a user")]
    UnknownOwner(i64),

    #[error("`{0}` must be a finite, non-negative number")]
    InvalidMetric(&'static str),

    #[error(
        "point {point} of sub path {sub_path} must have exactly two components, \
         got {components}"
    )]
    MalformedPoint {
        sub_path: usize,
        point: usize,
        components: usize,
    },

    #[error("point {point} of sub path {sub_path} is not a finite coordinate")]
    NonFiniteCoordinate { sub_path: usize, point: usize },
}

/// A submission whose fields are all present and well formed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSubmission {
    pub owner_user_id: Id<User>,
    pub duration_minutes: f64,
    pub distance_km: f64,
    pub sub_paths: Vec<Vec<Coordinate>>,
}

impl TryFrom<MissionSubmission> for ValidatedSubmission {
    type Error = ValidationError;

    fn try_from(submission: MissionSubmission) -> Result<Self, Self::Error> {
        let owner_user_id = submission
            .owner_user_id
            .ok_or(ValidationError::MissingField("ownerUserId"))?;
        if owner_user_id <= 0 {
            return Err(ValidationError::UnknownOwner(owner_user_id));
        }

        let duration_minutes = metric("durationMinutes", submission.duration_minutes)?;
        let distance_km = metric("distanceKm", submission.distance_km)?;

        let sub_paths = submission
            .sub_paths
            .ok_or(ValidationError::MissingField("subPaths"))?
            .into_iter()
            .enumerate()
            .map(|(sub_path, points)| coordinates(sub_path, points))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            owner_user_id: Id::new(owner_user_id),
            duration_minutes,
            distance_km,
            sub_paths,
        })
    }
}

fn metric(field: &'static str, value: Option<f64>) -> Result<f64, ValidationError> {
    match value {
        None => Err(ValidationError::MissingField(field)),
        Some(value) if value.is_finite() && value >= 0.0 => Ok(value),
        Some(_) => Err(ValidationError::InvalidMetric(field)),
    }
}

fn coordinates(
    sub_path: usize,
    points: Vec<Vec<f64>>,
) -> Result<Vec<Coordinate>, ValidationError> {
    points
        .into_iter()
        .enumerate()
        .map(|(point, components)| match components.as_slice() {
            [longitude, latitude] if longitude.is_finite() && latitude.is_finite() => {
                Ok(Coordinate::new(*longitude, *latitude))
            }
            [_, _] => Err(ValidationError::NonFiniteCoordinate { sub_path, point }),
            _ => Err(ValidationError::MalformedPoint {
                sub_path,
                point,
                components: components.len(),
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use model::ExampleData;

    use super::*;

    #[test]
    fn example_submission_is_valid() {
        let validated =
            ValidatedSubmission::try_from(MissionSubmission::example_data()).unwrap();
        assert_eq!(validated.owner_user_id, Id::new(1));
        assert_eq!(validated.sub_paths.len(), 1);
        assert_eq!(validated.sub_paths[0].len(), 5);
    }

    #[test]
    fn owner_is_required() {
        let submission = MissionSubmission {
            owner_user_id: None,
            ..MissionSubmission::example_data()
        };
        assert_eq!(
            ValidatedSubmission::try_from(submission),
            Err(ValidationError::MissingField("ownerUserId"))
        );
    }

    #[test]
    fn non_positive_owner_is_unknown() {
        let submission = MissionSubmission {
            owner_user_id: Some(0),
            ..MissionSubmission::example_data()
        };
        assert_eq!(
            ValidatedSubmission::try_from(submission),
            Err(ValidationError::UnknownOwner(0))
        );
    }

    #[test]
    fn metrics_are_required_and_non_negative() {
        let missing = MissionSubmission {
            duration_minutes: None,
            ..MissionSubmission::example_data()
        };
        assert_eq!(
            ValidatedSubmission::try_from(missing),
            Err(ValidationError::MissingField("durationMinutes"))
        );

        let negative = MissionSubmission {
            distance_km: Some(-1.0),
            ..MissionSubmission::example_data()
        };
        assert_eq!(
            ValidatedSubmission::try_from(negative),
            Err(ValidationError::InvalidMetric("distanceKm"))
        );
    }

    #[test]
    fn zero_metrics_are_fine() {
        let submission = MissionSubmission {
            duration_minutes: Some(0.0),
            distance_km: Some(0.0),
            ..MissionSubmission::example_data()
        };
        assert!(ValidatedSubmission::try_from(submission).is_ok());
    }

    #[test]
    fn sub_paths_are_required_but_may_be_empty() {
        let missing = MissionSubmission {
            sub_paths: None,
            ..MissionSubmission::example_data()
        };
        assert_eq!(
            ValidatedSubmission::try_from(missing),
            Err(ValidationError::MissingField("subPaths"))
        );

        let empty = MissionSubmission {
            sub_paths: Some(vec![]),
            ..MissionSubmission::example_data()
        };
        assert!(ValidatedSubmission::try_from(empty).unwrap().sub_paths.is_empty());
    }

    #[test]
    fn points_need_two_components() {
        let submission = MissionSubmission {
            sub_paths: Some(vec![
                vec![vec![0.0, 0.0], vec![1.0, 1.0]],
                vec![vec![0.0, 0.0], vec![1.0]],
            ]),
            ..MissionSubmission::example_data()
        };
        let why = ValidatedSubmission::try_from(submission).unwrap_err();
        assert_eq!(
            why,
            ValidationError::MalformedPoint {
                sub_path: 1,
                point: 1,
                components: 1
            }
        );
        assert_eq!(
            why.to_string(),
            "point 1 of sub path 1 must have exactly two components, got 1"
        );
    }

    #[test]
    fn points_must_be_finite() {
        let submission = MissionSubmission {
            sub_paths: Some(vec![vec![vec![f64::NAN, 0.0]]]),
            ..MissionSubmission::example_data()
        };
        assert_eq!(
            ValidatedSubmission::try_from(submission),
            Err(ValidationError::NonFiniteCoordinate {
                sub_path: 0,
                point: 0
            })
        );
    }
}
