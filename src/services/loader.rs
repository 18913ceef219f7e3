use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

use crate::models::{Mentee, MenteeRecord, Mentor, MentorRecord, RecordError};

/// Errors that can occur while loading input records
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid record on row {row}: {source}")]
    InvalidRecord {
        row: usize,
        #[source]
        source: RecordError,
    },

    #[error("Duplicate id {id:?} on row {row}")]
    DuplicateId { row: usize, id: String },
}

/// Something with a unique id that can be loaded from a CSV row
trait Loadable: Sized {
    type Record: DeserializeOwned;

    fn from_record(record: Self::Record) -> Result<Self, RecordError>;
    fn id(&self) -> &str;
}

impl Loadable for Mentee {
    type Record = MenteeRecord;

    fn from_record(record: MenteeRecord) -> Result<Self, RecordError> {
        Mentee::try_from(record)
    }

    fn id(&self) -> &str {
        &self.person.id
    }
}

impl Loadable for Mentor {
    type Record = MentorRecord;

    fn from_record(record: MentorRecord) -> Result<Self, RecordError> {
        Mentor::try_from(record)
    }

    fn id(&self) -> &str {
        &self.person.id
    }
}

pub fn load_mentees<P: AsRef<Path>>(path: P) -> Result<Vec<Mentee>, LoadError> {
    let mentees = read_all(csv_reader(std::fs::File::open(path.as_ref())?))?;
    tracing::info!(count = mentees.len(), path = %path.as_ref().display(), "loaded mentees");
    Ok(mentees)
}

pub fn load_mentors<P: AsRef<Path>>(path: P) -> Result<Vec<Mentor>, LoadError> {
    let mentors = read_all(csv_reader(std::fs::File::open(path.as_ref())?))?;
    tracing::info!(count = mentors.len(), path = %path.as_ref().display(), "loaded mentors");
    Ok(mentors)
}

/// Parse mentees from any CSV source
pub fn read_mentees<R: Read>(reader: R) -> Result<Vec<Mentee>, LoadError> {
    read_all(csv_reader(reader))
}

/// Parse mentors from any CSV source
pub fn read_mentors<R: Read>(reader: R) -> Result<Vec<Mentor>, LoadError> {
    read_all(csv_reader(reader))
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader)
}

fn read_all<T: Loadable, R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<T>, LoadError> {
    let mut items = Vec::new();
    let mut seen = HashSet::new();

    for (index, result) in reader.deserialize::<T::Record>().enumerate() {
        // Header is row 1
        let row = index + 2;
        let record = result?;
        let item = T::from_record(record).map_err(|source| LoadError::InvalidRecord { row, source })?;

        if !seen.insert(item.id().to_string()) {
            return Err(LoadError::DuplicateId {
                row,
                id: item.id().to_string(),
            });
        }

        items.push(item);
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MENTEES: &str = "\
id,full_name,gender,contact_email,locations,intro,looking_for,state_of_origin,country_of_origin,gender_preference,prefers_from_origin
1,Ada Lovelace,Female,ada@example.com,Melbourne;Geelong,Hi,Career advice,NSW,AU,TRUE,false
2,Alan Turing, male ,alan@example.com,,,,,,,
";

    const MENTORS: &str = "\
id,full_name,gender,contact_email,locations,capacity
10,Grace Hopper,female,grace@example.com,Melbourne,2
11,Edsger Dijkstra,male,edsger@example.com,,
";

    #[test]
    fn test_read_mentees() {
        let mentees = read_mentees(MENTEES.as_bytes()).unwrap();

        assert_eq!(mentees.len(), 2);
        assert_eq!(mentees[0].person.id, "1");
        assert_eq!(mentees[0].person.gender, "female");
        assert_eq!(mentees[0].person.locations.len(), 2);
        assert_eq!(mentees[0].looking_for, "Career advice");
        assert_eq!(mentees[0].person.state_of_origin, "NSW");
        assert!(mentees[0].person.prefers_own_gender);
        assert!(!mentees[0].prefers_same_origin);

        assert_eq!(mentees[1].person.gender, "male");
        assert_eq!(mentees[1].person.intro, "Not provided");
        assert_eq!(mentees[1].person.state_of_origin, "VIC");
        assert!(mentees[1].prefers_same_origin);
    }

    #[test]
    fn test_read_mentors_without_optional_columns() {
        let mentors = read_mentors(MENTORS.as_bytes()).unwrap();

        assert_eq!(mentors.len(), 2);
        assert_eq!(mentors[0].capacity, 2);
        assert_eq!(mentors[1].capacity, 1);
        assert_eq!(mentors[1].person.country_of_origin, "AU");
        assert!(!mentors[1].person.prefers_own_gender);
    }

    #[test]
    fn test_missing_required_value_reports_row() {
        let data = "id,full_name,gender,contact_email\n1,Ada,female,ada@example.com\n2,,male,alan@example.com\n";

        let err = read_mentees(data.as_bytes()).unwrap_err();

        assert!(matches!(err, LoadError::InvalidRecord { row: 3, .. }));
    }

    #[test]
    fn test_missing_required_column_is_csv_error() {
        let data = "id,full_name,contact_email\n1,Ada,ada@example.com\n";
        assert!(matches!(read_mentees(data.as_bytes()), Err(LoadError::Csv(_))));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let data = "id,full_name,gender,contact_email\n1,Ada,female,a@x.com\n1,Alan,male,b@x.com\n";

        let err = read_mentors(data.as_bytes()).unwrap_err();

        assert!(matches!(err, LoadError::DuplicateId { row: 3, .. }));
    }

    #[test]
    fn test_invalid_capacity_rejected() {
        let data = "id,full_name,gender,contact_email,capacity\n1,Ada,female,a@x.com,-2\n";
        let err = read_mentors(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidRecord { row: 2, source: RecordError::InvalidCapacity { .. } }
        ));
    }
}
