//! Console pipeline: input, weather lookup, advice
//!
//! Every anticipated failure is turned into a printed message and an
//! [`Outcome`]; only console I/O errors are returned as `Err`.

use crate::advisor::ClothingAdvisor;
use crate::input::read_city;
use crate::models::WeatherSummary;
use crate::weather::WeatherClient;
use crate::Result;
use std::io::{BufRead, Write};
use tracing::{error, info};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Blank or missing city; nothing was fetched
    NoCity,
    /// The weather lookup failed; the advisor was not consulted
    WeatherUnavailable,
    /// A suggestion (or the missing-model explanation) was printed
    Suggested,
    /// The model failed while loading or generating
    AdvisorFailed,
}

pub struct App<A> {
    weather: WeatherClient,
    advisor: A,
}

impl<A: ClothingAdvisor> App<A> {
    pub fn new(weather: WeatherClient, advisor: A) -> Self {
        Self { weather, advisor }
    }

    pub fn advisor(&self) -> &A {
        &self.advisor
    }

    /// Run one session, reading the city from `input` and writing all
    /// user-facing text to `out`
    pub async fn run<R: BufRead, W: Write>(&self, input: R, out: &mut W) -> Result<Outcome> {
        writeln!(out, "Weather-based Clothing Advisor (LLM)")?;
        writeln!(out, "====================================")?;
        write!(out, "Enter city name: ")?;
        out.flush()?;

        let Some(city) = read_city(input)? else {
            writeln!(out, "No city provided. Exiting.")?;
            return Ok(Outcome::NoCity);
        };

        let weather = match self.weather.current(&city).await {
            Ok(weather) => weather,
            Err(e) => {
                error!("Weather lookup for '{}' failed: {}", city, e);
                writeln!(out, "Weather API error: {}", e.detail())?;
                writeln!(out, "Could not retrieve weather data.")?;
                return Ok(Outcome::WeatherUnavailable);
            }
        };

        let summary = WeatherSummary::from(&weather);
        writeln!(out, "{summary}")?;
        out.flush()?;

        match self.advisor.suggest(&summary).await {
            Ok(suggestion) => {
                info!("Suggestion ready for {}", weather.location());
                writeln!(out, "\nLLM Suggestion:")?;
                writeln!(out, "{suggestion}")?;
                Ok(Outcome::Suggested)
            }
            Err(e) => {
                error!("Clothing suggestion failed: {}", e);
                writeln!(out, "\nCould not generate a suggestion: {e}")?;
                Ok(Outcome::AdvisorFailed)
            }
        }
    }
}
