use serde::Deserialize;
use std::collections::HashMap;

// JSON:API envelope shared by every PUBG endpoint
#[derive(Debug, Deserialize)]
pub struct Document<T> {
    pub data: T,
    #[serde(default)]
    pub included: Vec<Included>,
}

#[derive(Debug, Deserialize)]
pub struct ResourceRef {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct RelationshipList {
    #[serde(default)]
    pub data: Vec<ResourceRef>,
}

// Players endpoint
#[derive(Debug, Deserialize)]
pub struct PlayerDto {
    pub id: String,
    pub attributes: PlayerAttributes,
    #[serde(default)]
    pub relationships: PlayerRelationships,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAttributes {
    pub name: String,
    #[serde(default)]
    pub shard_id: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct PlayerRelationships {
    #[serde(default)]
    pub matches: RelationshipList,
}

// Match endpoint
#[derive(Debug, Deserialize)]
pub struct MatchDto {
    pub id: String,
    pub attributes: MatchAttributes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAttributes {
    pub created_at: String,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub game_mode: String,
    #[serde(default)]
    pub map_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Included {
    Participant(ParticipantDto),
    Roster(RosterDto),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ParticipantDto {
    pub id: String,
    pub attributes: ParticipantAttributes,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ParticipantAttributes {
    pub stats: ParticipantStats,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantStats {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub player_id: String,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub damage_dealt: f64,
    #[serde(default)]
    pub time_survived: f64,
    #[serde(default)]
    pub win_place: u32,
    #[serde(default)]
    pub death_type: String,
    #[serde(default)]
    pub walk_distance: f64,
    #[serde(default)]
    pub ride_distance: f64,
    #[serde(default)]
    pub swim_distance: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RosterDto {
    pub id: String,
    pub attributes: RosterAttributes,
    #[serde(default)]
    pub relationships: RosterRelationships,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RosterAttributes {
    pub stats: RosterStats,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RosterStats {
    pub rank: u32,
    #[serde(default)]
    pub team_id: i64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RosterRelationships {
    #[serde(default)]
    pub participants: RelationshipRefs,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RelationshipRefs {
    #[serde(default)]
    pub data: Vec<ParticipantRef>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ParticipantRef {
    pub id: String,
}

// Seasons endpoints
#[derive(Debug, Deserialize)]
pub struct SeasonDto {
    pub id: String,
    pub attributes: SeasonAttributes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonAttributes {
    pub is_current_season: bool,
    #[serde(default)]
    pub is_offseason: bool,
}

#[derive(Debug, Deserialize)]
pub struct PlayerSeasonDto {
    pub attributes: PlayerSeasonAttributes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSeasonAttributes {
    pub game_mode_stats: HashMap<String, GameModeStats>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GameModeStats {
    #[serde(default)]
    pub rounds_played: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub top10s: u32,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub damage_dealt: f64,
    #[serde(default)]
    pub time_survived: f64,
}
