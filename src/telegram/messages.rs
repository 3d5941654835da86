//! User-facing reply texts

pub const START: &str = "Moro! 👋\n\nLähetä minulle MobilePay-sovelluksesta viety Excel-tiedosto (.xlsx), \
niin teen siitä yhteenvedon komennolla /kuvaaja.";

pub const WRONG_MIME_TYPE: &str = "Virhe: Lähetä Excel-tiedosto!";
pub const RESOLVE_FAILED: &str = "Virhe: Tiedostoa ei saatu noudettua!";
pub const DOWNLOAD_FAILED: &str = "Virhe: Tiedostoa ei saatu ladattua!";
pub const FILE_SAVED: &str = "Excel-tiedosto tallennettu! Piirrä kuvaaja komennolla /kuvaaja";

pub const NO_DATA: &str = "Ei dataa! Lähetä ensin Excel-tiedosto.";
pub const INVALID_FILE: &str = "Virheellinen Excel-tiedosto! ❌";
pub const NO_ENTRIES: &str = "Ei vielä maksuja tiedostossa! ❌";

pub const SERVER_ERROR: &str = "Palvelinvirhe, yritä myöhemmin uudelleen! ❌";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_replies() {
        assert_eq!(FILE_SAVED, "Excel-tiedosto tallennettu! Piirrä kuvaaja komennolla /kuvaaja");
        assert_eq!(WRONG_MIME_TYPE, "Virhe: Lähetä Excel-tiedosto!");
        assert_eq!(RESOLVE_FAILED, "Virhe: Tiedostoa ei saatu noudettua!");
        assert_eq!(DOWNLOAD_FAILED, "Virhe: Tiedostoa ei saatu ladattua!");
    }
}
