// src/room.rs
use std::fmt;

/// A room as the scheduling site identifies it. Field names follow the site's
/// form parameters (`gebaeude` = building, `geschoss` = floor).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Room {
    pub name: String,
    pub region: String,
    pub areal: String,
    pub gebaeude: String,
    pub geschoss: String,
    pub raum_nr: String,
}

impl Room {
    /// The site's identifying fields, as form/query pairs.
    pub fn fields(&self) -> [(&'static str, String); 5] {
        [
            ("region", self.region.clone()),
            ("areal", self.areal.clone()),
            ("gebaeude", self.gebaeude.clone()),
            ("geschoss", self.geschoss.clone()),
            ("raumNr", self.raum_nr.clone()),
        ]
    }

    /// Stable per-room file stem for the local cache.
    pub fn cache_key(&self) -> String {
        let mut key = s!();
        for (_, v) in self.fields() {
            key.extend(v.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '-'));
        }
        key
    }

    /// Build from query pairs (`region=Z&areal=Z&gebaeude=CAB&…`). All five
    /// fields are required.
    pub fn from_pairs<'a, I>(name: &str, pairs: I) -> Option<Room>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let (mut region, mut areal, mut gebaeude, mut geschoss, mut raum_nr) =
            (None, None, None, None, None);
        for (k, v) in pairs {
            let slot = match k {
                "region" => &mut region,
                "areal" => &mut areal,
                "gebaeude" => &mut gebaeude,
                "geschoss" => &mut geschoss,
                "raumNr" => &mut raum_nr,
                _ => continue,
            };
            *slot = Some(s!(v.trim()));
        }
        Some(Room {
            name: s!(name),
            region: region?,
            areal: areal?,
            gebaeude: gebaeude?,
            geschoss: geschoss?,
            raum_nr: raum_nr?,
        })
    }

    /// Cache row: name followed by the five fields.
    pub fn to_record(&self) -> Vec<String> {
        let mut rec = vec![self.name.clone()];
        rec.extend(self.fields().into_iter().map(|(_, v)| v));
        rec
    }

    pub fn from_record(rec: &[String]) -> Option<Room> {
        match rec {
            [name, region, areal, gebaeude, geschoss, raum_nr] => Some(Room {
                name: name.clone(),
                region: region.clone(),
                areal: areal.clone(),
                gebaeude: gebaeude.clone(),
                geschoss: geschoss.clone(),
                raum_nr: raum_nr.clone(),
            }),
            _ => None,
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{} {} {}", self.gebaeude, self.geschoss, self.raum_nr)
        } else {
            f.write_str(&self.name)
        }
    }
}
