//! Load farm profiles from CSV
//!
//! The header row uses the same field names as the JSON request, e.g.
//! `farm_name,region,enterprise,hectares,expected_yield_t_per_ha,...`

use csv::Reader;
use std::path::Path;

use super::FarmProfile;
use crate::error::Result;

/// Load all profiles from a CSV file
pub fn load_profiles<P: AsRef<Path>>(path: P) -> Result<Vec<FarmProfile>> {
    let reader = Reader::from_path(path)?;
    collect_profiles(reader)
}

/// Load profiles from any reader (e.g., string buffer, network stream)
pub fn load_profiles_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<FarmProfile>> {
    collect_profiles(Reader::from_reader(reader))
}

fn collect_profiles<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<FarmProfile>> {
    let mut profiles = Vec::new();
    for row in reader.deserialize() {
        let profile: FarmProfile = row?;
        profiles.push(profile);
    }
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForecastError;

    const HEADER: &str = "farm_name,region,enterprise,hectares,expected_yield_t_per_ha,\
expected_price_per_tonne,fixed_expenses,variable_costs_per_hectare,loan_balance,loan_rate,\
loan_term_years,start_month,years_forecasted";

    #[test]
    fn test_load_profiles_from_reader() {
        let data = format!(
            "{}\nRiverbend,Wimmera,wheat,100,5,300,12000,200,50000,6,10,April,3\n\
             Hillside,Canterbury,barley,50,4,250,8000,150,20000,5,2,November,4\n",
            HEADER
        );
        let profiles = load_profiles_from_reader(data.as_bytes()).unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].farm_name, "Riverbend");
        assert_eq!(profiles[1].start_month, "November");
        assert_eq!(profiles[1].loan_term_years, 2.0);
    }

    #[test]
    fn test_malformed_row_is_an_error() {
        let data = format!("{}\nBroken,X,Y,not-a-number,5,300,0,0,0,0,1,April,1\n", HEADER);
        assert!(matches!(
            load_profiles_from_reader(data.as_bytes()),
            Err(ForecastError::Csv(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(load_profiles("does/not/exist.csv").is_err());
    }
}
