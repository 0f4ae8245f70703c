// PUBG API URL builders

pub const API_BASE: &str = "https://api.pubg.com";

pub fn players_by_name(base: &str, shard: &str, player_name: &str) -> String {
    format!("{}/shards/{}/players?filter[playerNames]={}", base, shard, player_name)
}

pub fn match_detail(base: &str, shard: &str, match_id: &str) -> String {
    format!("{}/shards/{}/matches/{}", base, shard, match_id)
}

pub fn seasons(base: &str, shard: &str) -> String {
    format!("{}/shards/{}/seasons", base, shard)
}

pub fn player_season(base: &str, shard: &str, account_id: &str, season_id: &str) -> String {
    format!("{}/shards/{}/players/{}/seasons/{}", base, shard, account_id, season_id)
}
