//! Districts offered by the shipping selector.

/// The capital district; orders shipped here use the inside rate.
pub const CAPITAL_DISTRICT: &str = "Dhaka";

/// The 64 districts of Bangladesh, alphabetically.
pub const DISTRICTS: [&str; 64] = [
    "Bagerhat",
    "Bandarban",
    "Barguna",
    "Barishal",
    "Bhola",
    "Bogura",
    "Brahmanbaria",
    "Chandpur",
    "Chapainawabganj",
    "Chattogram",
    "Chuadanga",
    "Cox's Bazar",
    "Cumilla",
    "Dhaka",
    "Dinajpur",
    "Faridpur",
    "Feni",
    "Gaibandha",
    "Gazipur",
    "Gopalganj",
    "Habiganj",
    "Jamalpur",
    "Jashore",
    "Jhalokati",
    "Jhenaidah",
    "Joypurhat",
    "Khagrachhari",
    "Khulna",
    "Kishoreganj",
    "Kurigram",
    "Kushtia",
    "Lakshmipur",
    "Lalmonirhat",
    "Madaripur",
    "Magura",
    "Manikganj",
    "Meherpur",
    "Moulvibazar",
    "Munshiganj",
    "Mymensingh",
    "Naogaon",
    "Narail",
    "Narayanganj",
    "Narsingdi",
    "Natore",
    "Netrokona",
    "Nilphamari",
    "Noakhali",
    "Pabna",
    "Panchagarh",
    "Patuakhali",
    "Pirojpur",
    "Rajbari",
    "Rajshahi",
    "Rangamati",
    "Rangpur",
    "Satkhira",
    "Shariatpur",
    "Sherpur",
    "Sirajganj",
    "Sunamganj",
    "Sylhet",
    "Tangail",
    "Thakurgaon",
];

/// Compare two district names the way the shipping rules do:
/// surrounding whitespace and ASCII case are ignored.
#[must_use]
pub fn same_district(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Look up the canonical spelling of a district, if it is one of [`DISTRICTS`].
#[must_use]
pub fn canonical(name: &str) -> Option<&'static str> {
    DISTRICTS.iter().copied().find(|d| same_district(d, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capital_is_listed() {
        assert_eq!(canonical(" dhaka "), Some(CAPITAL_DISTRICT));
    }

    #[test]
    fn test_unknown_district() {
        assert_eq!(canonical("Atlantis"), None);
    }

    #[test]
    fn test_list_is_sorted_and_unique() {
        let mut sorted = DISTRICTS.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), DISTRICTS.len());
        assert_eq!(sorted, DISTRICTS.to_vec());
    }
}
