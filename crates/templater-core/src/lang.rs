//! Language tables used for date formatting and bilingual banners.
//!
//! Month names and meridiem strings are plain data passed explicitly to the
//! formatters; nothing here reads or changes process locale settings.

use std::fmt;

use chrono::{Datelike, NaiveDateTime, Timelike};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Language {
    French,
    English,
}

const MONTHS_FR: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

impl Language {
    pub const BOTH: [Language; 2] = [Language::French, Language::English];

    /// Suffix used in template file names (`invite-fr.txt`).
    pub fn code(&self) -> &'static str {
        match self {
            Language::French => "fr",
            Language::English => "en",
        }
    }

    pub fn other(&self) -> Language {
        match self {
            Language::French => Language::English,
            Language::English => Language::French,
        }
    }

    pub fn month_name(&self, when: &NaiveDateTime) -> &'static str {
        let index = when.month0() as usize;
        match self {
            Language::French => MONTHS_FR[index],
            Language::English => MONTHS_EN[index],
        }
    }

    /// Written in this language, tells readers the content continues below.
    pub fn follows_banner(&self) -> &'static str {
        match self {
            Language::French => "français plus bas",
            Language::English => "English follows",
        }
    }

    /// Time of day: 24-hour `18:30` in French, 12-hour `6:30 pm` in English.
    pub fn time(&self, when: &NaiveDateTime) -> String {
        match self {
            Language::French => format!("{:02}:{:02}", when.hour(), when.minute()),
            Language::English => {
                let (pm, hour) = when.hour12();
                let meridiem = if pm { "pm" } else { "am" };
                format!("{hour}:{:02} {meridiem}", when.minute())
            }
        }
    }

    /// Long date with time, e.g. `12 mars, 2024 à 18:30` or
    /// `March 12, 2024 at 6:30 pm`.
    pub fn long_date(&self, when: &NaiveDateTime) -> String {
        let month = self.month_name(when);
        let time = self.time(when);
        match self {
            Language::French => {
                format!("{:02} {month}, {} à {time}", when.day(), when.year())
            }
            Language::English => {
                format!("{month} {:02}, {} at {time}", when.day(), when.year())
            }
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
