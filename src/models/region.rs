/// Administrative regions offered by the region picker, in display order.
///
/// The ledger accepts any non-empty region name; this list only drives
/// selection in the front-end.
pub const REGIONS: &[&str] = &[
    "Aparat",
    "Abşeron",
    "Ağcabədi",
    "Ağdam",
    "Ağdaş",
    "Ağdərə",
    "Ağstafa",
    "Ağsu",
    "Astara",
    "Bakı",
    "Babək (Naxçıvan MR)",
    "Balakən",
    "Bərdə",
    "Beyləqan",
    "Biləsuvar",
    "Cəbrayıl",
    "Cəlilabad",
    "Culfa (Naxçıvan MR)",
    "Daşkəsən",
    "Füzuli",
    "Gədəbəy",
    "Gəncə",
    "Goranboy",
    "Göyçay",
    "Göygöl",
    "Hacıqabul",
    "Xaçmaz",
    "Xankəndi",
    "Xızı",
    "Xocalı",
    "Xocavənd",
    "İmişli",
    "İsmayıllı",
    "Kəlbəcər",
    "Kəngərli (Naxçıvan MR)",
    "Kürdəmir",
    "Laçın",
    "Lənkəran",
    "Lerik",
    "Masallı",
    "Mingəçevir",
    "Naftalan",
    "Neftçala",
    "Naxçıvan",
    "Oğuz",
    "Siyəzən",
    "Ordubad (Naxçıvan MR)",
    "Qəbələ",
    "Qax",
    "Qazax",
    "Qobustan",
    "Quba",
    "Qubadlı",
    "Qusar",
    "Saatlı",
    "Sabirabad",
    "Sədərək (Naxçıvan MR)",
    "Salyan",
    "Samux",
    "Şabran",
    "Şahbuz (Naxçıvan MR)",
    "Şamaxı",
    "Şəki",
    "Şəmkir",
    "Şərur (Naxçıvan MR)",
    "Şirvan",
    "Şuşa",
    "Sumqayıt",
    "Tərtər",
    "Tovuz",
    "Ucar",
    "Yardımlı",
    "Yevlax",
    "Zaqatala",
    "Zəngilan",
    "Zərdab",
    "Nabran",
    "Xudat",
];

/// Find a catalogue region by name (case-insensitive). An exact match wins,
/// otherwise the first region starting with `query`.
pub fn find_region(query: &str) -> Option<&'static str> {
    let lower = query.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }
    REGIONS
        .iter()
        .find(|r| r.to_lowercase() == lower)
        .or_else(|| REGIONS.iter().find(|r| r.to_lowercase().starts_with(&lower)))
        .copied()
}
