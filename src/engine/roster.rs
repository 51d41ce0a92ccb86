//! Static field and track rosters

use crate::types::{Driver, Track, TrackType};

/// Number of cars in every generated field
pub const FIELD_SIZE: usize = 40;

const fn driver(
    id: u32,
    first_name: &'static str,
    last_name: &'static str,
    number: &'static str,
    manufacturer: &'static str,
    sponsor: &'static str,
) -> Driver {
    Driver {
        id,
        first_name,
        last_name,
        number,
        manufacturer,
        sponsor,
    }
}

/// The full field, one entry per car
pub static DRIVERS: [Driver; FIELD_SIZE] = [
    driver(3832, "Michael", "McDowell", "71", "Chv", "DePaul"),
    driver(3833, "Denny", "Hamlin", "11", "Toy", "FedEx"),
    driver(3834, "Kyle", "Larson", "5", "Chv", "HendrickCars.com"),
    driver(3835, "Chase", "Elliott", "9", "Chv", "NAPA"),
    driver(3836, "Martin", "Truex Jr.", "19", "Toy", "Bass Pro Shops"),
    driver(3837, "Kyle", "Busch", "8", "Chv", "Cheerios"),
    driver(3838, "William", "Byron", "24", "Chv", "Liberty University"),
    driver(3839, "Christopher", "Bell", "20", "Toy", "Rheem"),
    driver(3840, "Alex", "Bowman", "48", "Chv", "Ally"),
    driver(3841, "Ross", "Chastain", "1", "Chv", "Moose Fraternity"),
    driver(3842, "Tyler", "Reddick", "45", "Toy", "Monster Energy"),
    driver(3843, "Ryan", "Blaney", "12", "Frd", "Menards"),
    driver(3844, "Joey", "Logano", "22", "Frd", "Shell Pennzoil"),
    driver(3845, "Brad", "Keselowski", "6", "Frd", "Kohler"),
    driver(3846, "Kevin", "Harvick", "4", "Frd", "Mobil 1"),
    driver(3847, "Austin", "Cindric", "2", "Frd", "Discount Tire"),
    driver(3848, "Daniel", "Suarez", "99", "Chv", "Freeway Insurance"),
    driver(3849, "Bubba", "Wallace", "23", "Toy", "DoorDash"),
    driver(3850, "Chris", "Buescher", "17", "Frd", "Fastenal"),
    driver(3851, "Austin", "Dillon", "3", "Chv", "Bass Pro Shops"),
    driver(3852, "Aric", "Almirola", "10", "Frd", "Smithfield"),
    driver(3853, "Erik", "Jones", "43", "Chv", "FOCUSfactor"),
    driver(3854, "Ricky", "Stenhouse Jr.", "47", "Chv", "Kroger"),
    driver(3855, "AJ", "Allmendinger", "16", "Chv", "Hyperice"),
    driver(3856, "Noah", "Gragson", "42", "Chv", "Beard Oil"),
    driver(3857, "Ty", "Gibbs", "54", "Toy", "Interstate Batteries"),
    driver(3858, "Todd", "Gilliland", "38", "Frd", "Speedco"),
    driver(3859, "Corey", "LaJoie", "7", "Chv", "Spire Motorsports"),
    driver(3860, "Harrison", "Burton", "21", "Frd", "Motorcraft"),
    driver(3861, "Ryan", "Preece", "41", "Frd", "HaasTooling.com"),
    driver(3862, "Ty", "Dillon", "13", "Chv", "GEICO"),
    driver(3863, "Carson", "Hocevar", "77", "Chv", "Trane"),
    driver(3864, "Zane", "Smith", "71", "Chv", "Spire Motorsports"),
    driver(3865, "Justin", "Haley", "51", "Frd", "Fraternal Order of Eagles"),
    driver(3866, "Josh", "Berry", "4", "Frd", "Overstock.com"),
    driver(3867, "John Hunter", "Nemechek", "42", "Toy", "FOCUSfactor"),
    driver(3868, "Jimmie", "Johnson", "84", "Chv", "Carvana"),
    driver(3869, "Daniel", "Hemric", "31", "Chv", "Kaulig Racing"),
    driver(3870, "Shane", "van Gisbergen", "88", "Chv", "Wendy's"),
    driver(3871, "Kaz", "Grala", "15", "Frd", "Hy-Vee"),
];

/// Circuits a mock race can be run at
pub static TRACKS: [Track; 7] = [
    Track { id: 218, name: "Chicago Street Course", length: 2.2, track_type: TrackType::Street },
    Track { id: 1, name: "Daytona International Speedway", length: 2.5, track_type: TrackType::Superspeedway },
    Track { id: 2, name: "Atlanta Motor Speedway", length: 1.54, track_type: TrackType::Intermediate },
    Track { id: 3, name: "Charlotte Motor Speedway", length: 1.5, track_type: TrackType::Intermediate },
    Track { id: 4, name: "Martinsville Speedway", length: 0.526, track_type: TrackType::ShortTrack },
    Track { id: 5, name: "Bristol Motor Speedway", length: 0.533, track_type: TrackType::ShortTrack },
    Track { id: 6, name: "Phoenix Raceway", length: 1.0, track_type: TrackType::ShortTrack },
];
