/// Stable country identity (Natural Earth `NE_ID`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CountryId(pub i64);

impl CountryId {
    pub fn new(n: i64) -> Self {
        CountryId(n)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for CountryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
