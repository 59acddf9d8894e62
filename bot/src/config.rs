use crate::errors::{Error, Result};

use lazy_static::lazy_static;
use log::LevelFilter;
use migrator::{RelayConfig, DEFAULT_RELAY_NAME};
use regex::Regex;
use std::env;
use std::str::FromStr;
use url::Url;

const TOKEN_VAR: &str = "DISCORD_TOKEN";
const SOURCE_VAR: &str = "MIGRATE_SOURCE";
const DESTINATION_VAR: &str = "MIGRATE_DESTINATION";
const RELAY_NAME_VAR: &str = "MIGRATE_RELAY_NAME";
const RELAY_AVATAR_VAR: &str = "MIGRATE_RELAY_AVATAR";
const MANAGED_ONLY_VAR: &str = "MIGRATE_MANAGED_RELAYS_ONLY";
const PAGE_BUDGET_VAR: &str = "MIGRATE_PAGE_FAILURE_BUDGET";
const LOG_LEVEL_VAR: &str = "MIGRATE_LOG_LEVEL";

const DEFAULT_PAGE_FAILURE_BUDGET: u8 = 3;

#[derive(Debug)]
pub struct Config {
    pub token: String,
    pub source: u64,
    pub destination: u64,
    pub relay: RelayConfig,
    pub page_failure_budget: u8,
}

/// Accepts a raw id, a `<#id>` mention or a channel link
pub fn parse_channel(input: &str) -> Result<u64> {
    lazy_static! {
        static ref MENTION: Regex = Regex::new(r"^<#(\d+)>$").unwrap();
    }
    let input = input.trim();
    if let Some(caps) = MENTION.captures(input) {
        return Ok(caps[1].parse()?);
    }

    if input.starts_with("http://") || input.starts_with("https://") {
        let url = Url::parse(input)?;
        let segments: Vec<&str> = url.path_segments().map_or_else(Vec::new, |s| s.collect());
        // channels/<guild>/<channel>[/<message>]
        return match segments.as_slice() {
            ["channels", _guild, channel, ..] => Ok(channel.parse()?),
            _ => Err(Error::Internal(format!("{input} is not a channel link"))),
        };
    }

    Ok(input.parse()?)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Module log level, read before anything else so config errors get logged
pub fn log_level() -> LevelFilter {
    env::var(LOG_LEVEL_VAR)
        .ok()
        .and_then(|level| LevelFilter::from_str(&level).ok())
        .unwrap_or(LevelFilter::Debug)
}

impl Config {
    pub fn from_env(args: &[String]) -> Result<Config> {
        Config::from_lookup(|name| env::var(name).ok(), args)
    }

    /// Positional arguments, when given, take precedence over the
    /// source and destination variables.
    pub fn from_lookup<F>(lookup: F, args: &[String]) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(TOKEN_VAR).ok_or(Error::MissingVar(TOKEN_VAR))?;

        let source = match args.get(0) {
            Some(arg) => arg.clone(),
            None => lookup(SOURCE_VAR).ok_or(Error::MissingVar(SOURCE_VAR))?,
        };
        let destination = match args.get(1) {
            Some(arg) => arg.clone(),
            None => lookup(DESTINATION_VAR).ok_or(Error::MissingVar(DESTINATION_VAR))?,
        };

        let relay = RelayConfig {
            name: lookup(RELAY_NAME_VAR).unwrap_or_else(|| DEFAULT_RELAY_NAME.to_string()),
            avatar: lookup(RELAY_AVATAR_VAR).filter(|path| !path.is_empty()),
            managed_only: match lookup(MANAGED_ONLY_VAR) {
                Some(value) => parse_bool(&value)
                    .ok_or(Error::ConstStr("MIGRATE_MANAGED_RELAYS_ONLY must be a boolean"))?,
                None => true,
            },
        };

        let page_failure_budget = match lookup(PAGE_BUDGET_VAR) {
            Some(value) => value.trim().parse()?,
            None => DEFAULT_PAGE_FAILURE_BUDGET,
        };

        Ok(Config {
            token,
            source: parse_channel(&source)?,
            destination: parse_channel(&destination)?,
            relay,
            page_failure_budget,
        })
    }
}
