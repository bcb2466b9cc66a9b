use serde::Serialize;
use ts_rs::TS;

use crate::db::models::{DateStatus, PersonProfile};

/// How many people the recent-ratings chart shows.
pub const RECENT_RATINGS_LIMIT: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: DateStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RecentRating {
    pub name: String,
    pub rating: u8,
}

/// Dashboard aggregates over the whole collection.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_people: usize,
    pub total_dates: usize,
    pub total_red_flags: usize,
    pub total_green_flags: usize,
    /// Mean latest rating over rated profiles, one decimal.
    pub average_rating: f64,
    /// Count per current status, in first-seen order.
    pub status_breakdown: Vec<StatusCount>,
    pub recent_ratings: Vec<RecentRating>,
}

impl DashboardStats {
    pub fn compute(people: &[PersonProfile]) -> Self {
        let ratings: Vec<u8> = people.iter().filter_map(|p| p.latest_rating).collect();
        let average_rating = if ratings.is_empty() {
            0.0
        } else {
            let mean = ratings.iter().map(|&r| r as f64).sum::<f64>() / ratings.len() as f64;
            (mean * 10.0).round() / 10.0
        };

        let mut status_breakdown: Vec<StatusCount> = Vec::new();
        for person in people {
            match status_breakdown.iter_mut().find(|c| c.status == person.status) {
                Some(c) => c.count += 1,
                None => status_breakdown.push(StatusCount { status: person.status, count: 1 }),
            }
        }

        let mut rated: Vec<&PersonProfile> =
            people.iter().filter(|p| p.latest_rating.is_some()).collect();
        rated.sort_by(|a, b| b.last_interaction_date.cmp(&a.last_interaction_date));
        let recent_ratings = rated
            .into_iter()
            .take(RECENT_RATINGS_LIMIT)
            .filter_map(|p| {
                p.latest_rating.map(|rating| RecentRating {
                    name: p.first_name().to_string(),
                    rating,
                })
            })
            .collect();

        Self {
            total_people: people.len(),
            total_dates: people.iter().map(|p| p.entries.len()).sum(),
            total_red_flags: people.iter().map(|p| p.all_red_flags.len()).sum(),
            total_green_flags: people.iter().map(|p| p.all_green_flags.len()).sum(),
            average_rating,
            status_breakdown,
            recent_ratings,
        }
    }
}

/// People ordered by latest rating, best first. Unrated sort last; ties
/// keep collection order.
pub fn ranked_by_rating(people: &[PersonProfile]) -> Vec<&PersonProfile> {
    let mut ranked: Vec<&PersonProfile> = people.iter().collect();
    ranked.sort_by(|a, b| b.latest_rating.cmp(&a.latest_rating));
    ranked
}
