//! Flattened account state captured at one end of a play session.

use super::models::{AchievementProgress, Account, Character, WalletEntry};
use chrono::{DateTime, Utc};

/// Wallet currency ids tracked by sessions
pub mod currency {
    /// Coins, in copper
    pub const COINS: u32 = 1;
    /// Karma
    pub const KARMA: u32 = 2;
    /// Laurels
    pub const LAURELS: u32 = 3;
    /// Badges of Honor
    pub const BADGES_OF_HONOR: u32 = 15;
    /// Guild Commendations
    pub const GUILD_COMMENDATIONS: u32 = 16;
    /// WvW Skirmish Claim Tickets
    pub const WVW_TICKETS: u32 = 26;
    /// Proofs of Heroics
    pub const PROOFS_OF_HEROICS: u32 = 31;
    /// Testimonies of Heroics
    pub const TESTIMONIES_OF_HEROICS: u32 = 36;
}

/// WvW achievement ids tracked by sessions
pub mod achievement {
    /// Realm Avenger (players killed)
    pub const PLAYERS_KILLED: u32 = 283;
    /// A Pack Dolyak (yaks escorted)
    pub const YAKS_ESCORTED: u32 = 285;
    /// Dolyak Disruptor (yaks killed)
    pub const YAKS_KILLED: u32 = 288;
    /// Flipping Camps
    pub const CAMPS_CAPTURED: u32 = 291;
    /// Emergency Evacuation (castles)
    pub const CASTLES_CAPTURED: u32 = 294;
    /// Tower Taker
    pub const TOWERS_CAPTURED: u32 = 297;
    /// Keep Conqueror
    pub const KEEPS_CAPTURED: u32 = 300;
}

/// Lifetime death counter of one character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterDeaths {
    /// Character name
    pub name: String,
    /// Profession
    pub profession: String,
    /// Lifetime deaths
    pub deaths: i64,
}

/// Counters captured from the API at a single point in time.
///
/// Missing wallet entries or achievements (the account never earned them)
/// count as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// When the data was fetched
    pub taken_at: DateTime<Utc>,
    /// Account name
    pub account_name: String,
    /// Coins, in copper
    pub coins: i64,
    /// Karma
    pub karma: i64,
    /// Laurels
    pub laurels: i64,
    /// Badges of Honor
    pub badges_of_honor: i64,
    /// Guild Commendations
    pub guild_commendations: i64,
    /// WvW Skirmish Claim Tickets
    pub wvw_tickets: i64,
    /// Proofs of Heroics
    pub proofs_of_heroics: i64,
    /// Testimonies of Heroics
    pub testimonies_of_heroics: i64,
    /// WvW rank
    pub wvw_rank: i64,
    /// Players killed
    pub players_killed: i64,
    /// Yaks escorted
    pub yaks_escorted: i64,
    /// Yaks killed
    pub yaks_killed: i64,
    /// Camps captured
    pub camps_captured: i64,
    /// Castles captured
    pub castles_captured: i64,
    /// Towers captured
    pub towers_captured: i64,
    /// Keeps captured
    pub keeps_captured: i64,
    /// Death counters, one per character
    pub characters: Vec<CharacterDeaths>,
}

impl Snapshot {
    /// Builds a snapshot from the raw API responses.
    #[must_use]
    pub fn from_api(
        taken_at: DateTime<Utc>,
        account: &Account,
        wallet: &[WalletEntry],
        achievements: &[AchievementProgress],
        characters: &[Character],
    ) -> Self {
        let wallet_value = |id: u32| {
            wallet
                .iter()
                .find(|entry| entry.id == id)
                .map_or(0, |entry| entry.value)
        };
        let progress = |id: u32| {
            achievements
                .iter()
                .find(|a| a.id == id)
                .and_then(|a| a.current)
                .unwrap_or(0)
        };

        Self {
            taken_at,
            account_name: account.name.clone(),
            coins: wallet_value(currency::COINS),
            karma: wallet_value(currency::KARMA),
            laurels: wallet_value(currency::LAURELS),
            badges_of_honor: wallet_value(currency::BADGES_OF_HONOR),
            guild_commendations: wallet_value(currency::GUILD_COMMENDATIONS),
            wvw_tickets: wallet_value(currency::WVW_TICKETS),
            proofs_of_heroics: wallet_value(currency::PROOFS_OF_HEROICS),
            testimonies_of_heroics: wallet_value(currency::TESTIMONIES_OF_HEROICS),
            wvw_rank: i64::from(account.wvw_rank.unwrap_or(0)),
            players_killed: progress(achievement::PLAYERS_KILLED),
            yaks_escorted: progress(achievement::YAKS_ESCORTED),
            yaks_killed: progress(achievement::YAKS_KILLED),
            camps_captured: progress(achievement::CAMPS_CAPTURED),
            castles_captured: progress(achievement::CASTLES_CAPTURED),
            towers_captured: progress(achievement::TOWERS_CAPTURED),
            keeps_captured: progress(achievement::KEEPS_CAPTURED),
            characters: characters
                .iter()
                .map(|c| CharacterDeaths {
                    name: c.name.clone(),
                    profession: c.profession.clone(),
                    deaths: c.deaths,
                })
                .collect(),
        }
    }
}
