//! Vaccination details shared by plain records, COVID records and
//! vaccination requests, plus the derived follow-up helpers.

use common::{
    nft::{self, NftMetadata},
    text, SECONDS_PER_DAY,
};
use soroban_sdk::{contracttype, Env, String, Vec};

use crate::ContractError;

const MAX_TEXT_LEN: u32 = 255;

/// Dates are unix timestamps in seconds.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VaccinationDetails {
    pub vaccine_name: String,
    pub vaccine_batch: String,
    pub dose_number: u32,
    pub vaccination_date: u64,
    pub next_dose_date: Option<u64>,
    pub vaccination_center: String,
    pub healthcare_provider: String,
    /// URI of the uploaded proof document.
    pub vaccination_proof: String,
    pub side_effects: Vec<String>,
    pub notes: Vec<String>,
}

impl VaccinationDetails {
    pub fn validate(&self) -> Result<(), ContractError> {
        for field in [
            &self.vaccine_name,
            &self.vaccine_batch,
            &self.vaccination_center,
            &self.healthcare_provider,
        ] {
            if field.is_empty() || field.len() > MAX_TEXT_LEN {
                return Err(ContractError::InvalidInput);
            }
        }
        if self.dose_number < 1 {
            return Err(ContractError::InvalidInput);
        }
        if let Some(next) = self.next_dose_date {
            if next <= self.vaccination_date {
                return Err(ContractError::InvalidInput);
            }
        }
        Ok(())
    }

    /// No further dose is due, or the next dose date has passed.
    pub fn is_complete(&self, now: u64) -> bool {
        match self.next_dose_date {
            None => true,
            Some(next) => next < now,
        }
    }

    pub fn needs_follow_up(&self, now: u64) -> bool {
        matches!(self.next_dose_date, Some(next) if next > now)
    }

    /// Whole days until the next dose; negative once it is overdue, 0 when
    /// there is no next dose.
    pub fn days_until_next_dose(&self, now: u64) -> i64 {
        match self.next_dose_date {
            None => 0,
            Some(next) => {
                let diff = i128::from(next) - i128::from(now);
                (diff / i128::from(SECONDS_PER_DAY)) as i64
            }
        }
    }
}

/// Totals shared by both statistics views.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VaccinationStatistics {
    pub total: u32,
    pub completed: u32,
    pub pending: u32,
    pub vaccine_types: Vec<String>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CovidStatistics {
    pub total: u32,
    pub completed: u32,
    pub pending: u32,
    pub vaccine_types: Vec<String>,
    pub nft_count: u32,
    pub insurance_coverage: i128,
}

pub fn tally(stats: &mut VaccinationStatistics, details: &VaccinationDetails, now: u64) {
    stats.total = stats.total.saturating_add(1);
    if details.is_complete(now) {
        stats.completed = stats.completed.saturating_add(1);
    }
    if details.needs_follow_up(now) {
        stats.pending = stats.pending.saturating_add(1);
    }
    if !stats.vaccine_types.contains(&details.vaccine_name) {
        stats.vaccine_types.push_back(details.vaccine_name.clone());
    }
}

pub fn empty_statistics(env: &Env) -> VaccinationStatistics {
    VaccinationStatistics {
        total: 0,
        completed: 0,
        pending: 0,
        vaccine_types: Vec::new(env),
    }
}

/// Token metadata for a COVID-19 vaccination record or completed request.
pub fn covid_nft_metadata(env: &Env, id: u64, details: &VaccinationDetails) -> NftMetadata {
    let mut attributes = Vec::new(env);
    attributes.push_back(nft::attribute(env, "Vaccine Name", details.vaccine_name.clone()));
    attributes.push_back(nft::attribute(env, "Vaccine Batch", details.vaccine_batch.clone()));
    attributes.push_back(nft::attribute(
        env,
        "Dose Number",
        text::u64_to_string(env, u64::from(details.dose_number)),
    ));
    attributes.push_back(nft::attribute(
        env,
        "Vaccination Date",
        text::u64_to_string(env, details.vaccination_date),
    ));
    attributes.push_back(nft::attribute(
        env,
        "Vaccination Center",
        details.vaccination_center.clone(),
    ));
    attributes.push_back(nft::attribute(
        env,
        "Healthcare Provider",
        details.healthcare_provider.clone(),
    ));

    NftMetadata {
        name: text::prefixed_id(env, "COVID-19 Vaccination Record #", id, 0),
        description: String::from_str(env, "Verified COVID-19 vaccination record"),
        image: details.vaccination_proof.clone(),
        attributes,
    }
}
