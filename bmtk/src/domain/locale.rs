// bmtk/src/domain/locale.rs
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ja,
    En,
}

impl FromStr for Locale {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ja" => Ok(Locale::Ja),
            "en" => Ok(Locale::En),
            other => Err(DomainError::InvalidArgument(format!(
                "Unsupported language: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Ja => write!(f, "ja"),
            Locale::En => write!(f, "en"),
        }
    }
}

/// Closed catalogue of user-facing strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    Count,
    Percentage,
    Browser,
    Folder,
    Domain,
    Year,
    Month,
    Weekday,
    Hour,
    Word,
    Rank,
    Depth,
    Date,
    Cumulative,
    RootFolder,
    Title,
    UrlCount,
    SubfolderCount,
    AllYears,
    NoWordsFound,
    Bookmarks,
    Folders,
    Modified,
    FirstCreated,
    LastCreated,
    Browsers,
    DepthRange,
    TitleLength,
    Years,
    FirstBookmark,
    LastBookmark,
    Label,
    Parent,
    Value,
    Text,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

const WEEKDAYS: [Message; 7] = [
    Message::Monday,
    Message::Tuesday,
    Message::Wednesday,
    Message::Thursday,
    Message::Friday,
    Message::Saturday,
    Message::Sunday,
];

const MONTHS: [Message; 12] = [
    Message::January,
    Message::February,
    Message::March,
    Message::April,
    Message::May,
    Message::June,
    Message::July,
    Message::August,
    Message::September,
    Message::October,
    Message::November,
    Message::December,
];

impl Message {
    pub fn text(&self, locale: Locale) -> &'static str {
        let (ja, en) = match self {
            Message::Count => ("件数", "Count"),
            Message::Percentage => ("割合 (%)", "Percentage (%)"),
            Message::Browser => ("ブラウザ", "Browser"),
            Message::Folder => ("フォルダ", "Folder"),
            Message::Domain => ("ドメイン", "Domain"),
            Message::Year => ("年", "Year"),
            Message::Month => ("月", "Month"),
            Message::Weekday => ("曜日", "Weekday"),
            Message::Hour => ("時間", "Hour"),
            Message::Word => ("単語", "Word"),
            Message::Rank => ("順位", "Rank"),
            Message::Depth => ("階層", "Depth"),
            Message::Date => ("日付", "Date"),
            Message::Cumulative => ("累計", "Cumulative"),
            Message::RootFolder => ("ルートフォルダ", "Root Folder"),
            Message::Title => ("タイトル", "Title"),
            Message::UrlCount => ("URL数", "URLs"),
            Message::SubfolderCount => ("子フォルダ", "Subfolders"),
            Message::AllYears => ("全期間", "All Years"),
            Message::NoWordsFound => ("単語が見つかりませんでした", "No words found"),
            Message::Bookmarks => ("ブックマーク数", "Bookmarks"),
            Message::Folders => ("フォルダ数", "Folders"),
            Message::Modified => ("更新済み", "Modified"),
            Message::FirstCreated => ("最初の登録日時", "First created"),
            Message::LastCreated => ("最後の登録日時", "Last created"),
            Message::Browsers => ("ブラウザ", "Browsers"),
            Message::DepthRange => ("階層 (最小/平均/最大)", "Depth (min/avg/max)"),
            Message::TitleLength => ("タイトル長 (平均/中央値)", "Title length (mean/median)"),
            Message::Years => ("年", "Years"),
            Message::FirstBookmark => ("最初の登録", "First"),
            Message::LastBookmark => ("最後の登録", "Last"),
            Message::Label => ("ラベル", "label"),
            Message::Parent => ("親", "parent"),
            Message::Value => ("値", "value"),
            Message::Text => ("テキスト", "text"),
            Message::Monday => ("月曜日", "Monday"),
            Message::Tuesday => ("火曜日", "Tuesday"),
            Message::Wednesday => ("水曜日", "Wednesday"),
            Message::Thursday => ("木曜日", "Thursday"),
            Message::Friday => ("金曜日", "Friday"),
            Message::Saturday => ("土曜日", "Saturday"),
            Message::Sunday => ("日曜日", "Sunday"),
            Message::January => ("1月", "Jan"),
            Message::February => ("2月", "Feb"),
            Message::March => ("3月", "Mar"),
            Message::April => ("4月", "Apr"),
            Message::May => ("5月", "May"),
            Message::June => ("6月", "Jun"),
            Message::July => ("7月", "Jul"),
            Message::August => ("8月", "Aug"),
            Message::September => ("9月", "Sep"),
            Message::October => ("10月", "Oct"),
            Message::November => ("11月", "Nov"),
            Message::December => ("12月", "Dec"),
        };
        match locale {
            Locale::Ja => ja,
            Locale::En => en,
        }
    }
}

/// Monday first
pub fn weekday_names(locale: Locale) -> Vec<String> {
    WEEKDAYS.iter().map(|m| m.text(locale).to_string()).collect()
}

/// Short weekday labels for heatmap rows
pub fn weekday_short_names(locale: Locale) -> Vec<String> {
    match locale {
        Locale::Ja => ["月", "火", "水", "木", "金", "土", "日"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        Locale::En => weekday_names(locale)
            .into_iter()
            .map(|name| name.chars().take(3).collect())
            .collect(),
    }
}

/// January first
pub fn month_names(locale: Locale) -> Vec<String> {
    MONTHS.iter().map(|m| m.text(locale).to_string()).collect()
}

pub fn hour_label(hour: u32, locale: Locale) -> String {
    match locale {
        Locale::Ja => format!("{:02}時", hour),
        Locale::En => format!("{:02}:00", hour),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_locale_when_weekday_names_then_monday_first() {
        assert_eq!(weekday_names(Locale::En)[0], "Monday");
        assert_eq!(weekday_names(Locale::Ja)[6], "日曜日");
        assert_eq!(weekday_short_names(Locale::En)[6], "Sun");
        assert_eq!(weekday_short_names(Locale::Ja)[0], "月");
    }

    #[test]
    fn given_locale_when_month_names_then_twelve_entries() {
        assert_eq!(month_names(Locale::Ja).len(), 12);
        assert_eq!(month_names(Locale::Ja)[9], "10月");
        assert_eq!(month_names(Locale::En)[11], "Dec");
    }

    #[test]
    fn given_hour_when_labelled_then_zero_padded() {
        assert_eq!(hour_label(7, Locale::Ja), "07時");
        assert_eq!(hour_label(23, Locale::En), "23:00");
    }

    #[test]
    fn given_table_headers_when_japanese_then_no_english_leaks() {
        for message in [
            Message::Bookmarks,
            Message::FirstCreated,
            Message::FirstBookmark,
            Message::LastBookmark,
            Message::Label,
            Message::Parent,
            Message::Value,
            Message::Text,
        ] {
            let ja = message.text(Locale::Ja);
            assert!(!ja.is_ascii(), "{:?} -> {}", message, ja);
            assert_ne!(ja, message.text(Locale::En));
        }
        assert_eq!(Message::Label.text(Locale::En), "label");
        assert_eq!(Message::FirstBookmark.text(Locale::Ja), "最初の登録");
    }

    #[test]
    fn given_language_string_when_parsing_then_accepts_known_codes() {
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
    }
}
