//! Boolean option groups carried by every place.
//!
//! The three groups (`service_options`, `menu_options`, `amenities`) nest two
//! categories each. [`OptionFlag`] names every leaf so list filters and
//! field-masked updates can address a single flag by its dotted path.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::place::Place;

/// Dining service flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Dining {
    /// Seating on the premises.
    pub dine_in: bool,
    /// Food to go.
    pub takeaway: bool,
    /// Accepts reservations.
    pub reservations: bool,
    /// Outdoor seating.
    pub outdoor_seating: bool,
    /// Caters for large groups.
    pub group_bookings: bool,
}

/// Meals served.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Meals {
    /// Breakfast.
    pub breakfast: bool,
    /// Lunch.
    pub lunch: bool,
    /// Dinner.
    pub dinner: bool,
    /// Brunch.
    pub brunch: bool,
}

/// `service_options` group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ServiceOptions {
    /// Dining flags.
    pub dining: Dining,
    /// Meal flags.
    pub meals: Meals,
}

/// Food menu flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct FoodMenu {
    /// Vegetarian dishes.
    pub vegetarian: bool,
    /// Children's menu.
    pub kids_menu: bool,
}

/// Drinks menu flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct DrinksMenu {
    /// Coffee.
    pub coffee: bool,
    /// Beer.
    pub beer: bool,
    /// Wine.
    pub wine: bool,
    /// Cocktails.
    pub cocktails: bool,
}

/// `menu_options` group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct MenuOptions {
    /// Food flags.
    pub food: FoodMenu,
    /// Drinks flags.
    pub drinks: DrinksMenu,
}

/// Facility flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Facilities {
    /// Customer restrooms.
    pub restrooms: bool,
    /// Wi-Fi.
    pub wifi: bool,
    /// Parking.
    pub parking: bool,
}

/// Accessibility flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Accessibility {
    /// Step-free entrance.
    pub wheelchair_access: bool,
    /// Accessible restroom.
    pub accessible_restroom: bool,
    /// Accessible seating.
    pub accessible_seating: bool,
}

/// `amenities` group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Amenities {
    /// Facility flags.
    pub facilities: Facilities,
    /// Accessibility flags.
    pub accessibility: Accessibility,
}

/// A single boolean leaf of the option groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionFlag {
    /// `service_options.dining.dine_in`
    DineIn,
    /// `service_options.dining.takeaway`
    Takeaway,
    /// `service_options.dining.reservations`
    Reservations,
    /// `service_options.dining.outdoor_seating`
    OutdoorSeating,
    /// `service_options.dining.group_bookings`
    GroupBookings,
    /// `service_options.meals.breakfast`
    Breakfast,
    /// `service_options.meals.lunch`
    Lunch,
    /// `service_options.meals.dinner`
    Dinner,
    /// `service_options.meals.brunch`
    Brunch,
    /// `menu_options.food.vegetarian`
    Vegetarian,
    /// `menu_options.food.kids_menu`
    KidsMenu,
    /// `menu_options.drinks.coffee`
    Coffee,
    /// `menu_options.drinks.beer`
    Beer,
    /// `menu_options.drinks.wine`
    Wine,
    /// `menu_options.drinks.cocktails`
    Cocktails,
    /// `amenities.facilities.restrooms`
    Restrooms,
    /// `amenities.facilities.wifi`
    Wifi,
    /// `amenities.facilities.parking`
    Parking,
    /// `amenities.accessibility.wheelchair_access`
    WheelchairAccess,
    /// `amenities.accessibility.accessible_restroom`
    AccessibleRestroom,
    /// `amenities.accessibility.accessible_seating`
    AccessibleSeating,
}

impl OptionFlag {
    /// Every flag, in document order.
    pub const ALL: [Self; 21] = [
        Self::DineIn,
        Self::Takeaway,
        Self::Reservations,
        Self::OutdoorSeating,
        Self::GroupBookings,
        Self::Breakfast,
        Self::Lunch,
        Self::Dinner,
        Self::Brunch,
        Self::Vegetarian,
        Self::KidsMenu,
        Self::Coffee,
        Self::Beer,
        Self::Wine,
        Self::Cocktails,
        Self::Restrooms,
        Self::Wifi,
        Self::Parking,
        Self::WheelchairAccess,
        Self::AccessibleRestroom,
        Self::AccessibleSeating,
    ];

    /// Flags that may be used as place-list filters.
    pub const SERVICE: [Self; 9] = [
        Self::DineIn,
        Self::Takeaway,
        Self::Reservations,
        Self::OutdoorSeating,
        Self::GroupBookings,
        Self::Breakfast,
        Self::Lunch,
        Self::Dinner,
        Self::Brunch,
    ];

    /// Top-level group, e.g. `service_options`.
    #[must_use]
    pub const fn group(self) -> &'static str {
        match self {
            Self::DineIn
            | Self::Takeaway
            | Self::Reservations
            | Self::OutdoorSeating
            | Self::GroupBookings
            | Self::Breakfast
            | Self::Lunch
            | Self::Dinner
            | Self::Brunch => "service_options",
            Self::Vegetarian
            | Self::KidsMenu
            | Self::Coffee
            | Self::Beer
            | Self::Wine
            | Self::Cocktails => "menu_options",
            Self::Restrooms
            | Self::Wifi
            | Self::Parking
            | Self::WheelchairAccess
            | Self::AccessibleRestroom
            | Self::AccessibleSeating => "amenities",
        }
    }

    /// Category inside the group, e.g. `dining`.
    #[must_use]
    pub const fn category(self) -> &'static str {
        match self {
            Self::DineIn
            | Self::Takeaway
            | Self::Reservations
            | Self::OutdoorSeating
            | Self::GroupBookings => "dining",
            Self::Breakfast | Self::Lunch | Self::Dinner | Self::Brunch => "meals",
            Self::Vegetarian | Self::KidsMenu => "food",
            Self::Coffee | Self::Beer | Self::Wine | Self::Cocktails => "drinks",
            Self::Restrooms | Self::Wifi | Self::Parking => "facilities",
            Self::WheelchairAccess | Self::AccessibleRestroom | Self::AccessibleSeating => {
                "accessibility"
            }
        }
    }

    /// Leaf name, which doubles as the query parameter for service flags.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DineIn => "dine_in",
            Self::Takeaway => "takeaway",
            Self::Reservations => "reservations",
            Self::OutdoorSeating => "outdoor_seating",
            Self::GroupBookings => "group_bookings",
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Brunch => "brunch",
            Self::Vegetarian => "vegetarian",
            Self::KidsMenu => "kids_menu",
            Self::Coffee => "coffee",
            Self::Beer => "beer",
            Self::Wine => "wine",
            Self::Cocktails => "cocktails",
            Self::Restrooms => "restrooms",
            Self::Wifi => "wifi",
            Self::Parking => "parking",
            Self::WheelchairAccess => "wheelchair_access",
            Self::AccessibleRestroom => "accessible_restroom",
            Self::AccessibleSeating => "accessible_seating",
        }
    }

    /// Dotted document path, e.g. `service_options.dining.dine_in`.
    #[must_use]
    pub fn path(self) -> String {
        format!("{}.{}.{}", self.group(), self.category(), self.name())
    }

    /// Resolve a flag from its three path segments.
    ///
    /// # Examples
    /// ```
    /// use food_places::domain::catalogue::OptionFlag;
    ///
    /// assert_eq!(
    ///     OptionFlag::lookup("amenities", "facilities", "wifi"),
    ///     Some(OptionFlag::Wifi)
    /// );
    /// assert_eq!(OptionFlag::lookup("amenities", "dining", "wifi"), None);
    /// ```
    #[must_use]
    pub fn lookup(group: &str, category: &str, name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| {
            flag.group() == group && flag.category() == category && flag.name() == name
        })
    }

    /// Current value on `place`.
    #[must_use]
    pub fn get(self, place: &Place) -> bool {
        let dining = &place.service_options.dining;
        let meals = &place.service_options.meals;
        let food = &place.menu_options.food;
        let drinks = &place.menu_options.drinks;
        let facilities = &place.amenities.facilities;
        let access = &place.amenities.accessibility;
        match self {
            Self::DineIn => dining.dine_in,
            Self::Takeaway => dining.takeaway,
            Self::Reservations => dining.reservations,
            Self::OutdoorSeating => dining.outdoor_seating,
            Self::GroupBookings => dining.group_bookings,
            Self::Breakfast => meals.breakfast,
            Self::Lunch => meals.lunch,
            Self::Dinner => meals.dinner,
            Self::Brunch => meals.brunch,
            Self::Vegetarian => food.vegetarian,
            Self::KidsMenu => food.kids_menu,
            Self::Coffee => drinks.coffee,
            Self::Beer => drinks.beer,
            Self::Wine => drinks.wine,
            Self::Cocktails => drinks.cocktails,
            Self::Restrooms => facilities.restrooms,
            Self::Wifi => facilities.wifi,
            Self::Parking => facilities.parking,
            Self::WheelchairAccess => access.wheelchair_access,
            Self::AccessibleRestroom => access.accessible_restroom,
            Self::AccessibleSeating => access.accessible_seating,
        }
    }

    /// Overwrite the value on `place`, leaving every other flag untouched.
    pub fn set(self, place: &mut Place, value: bool) {
        let slot = match self {
            Self::DineIn => &mut place.service_options.dining.dine_in,
            Self::Takeaway => &mut place.service_options.dining.takeaway,
            Self::Reservations => &mut place.service_options.dining.reservations,
            Self::OutdoorSeating => &mut place.service_options.dining.outdoor_seating,
            Self::GroupBookings => &mut place.service_options.dining.group_bookings,
            Self::Breakfast => &mut place.service_options.meals.breakfast,
            Self::Lunch => &mut place.service_options.meals.lunch,
            Self::Dinner => &mut place.service_options.meals.dinner,
            Self::Brunch => &mut place.service_options.meals.brunch,
            Self::Vegetarian => &mut place.menu_options.food.vegetarian,
            Self::KidsMenu => &mut place.menu_options.food.kids_menu,
            Self::Coffee => &mut place.menu_options.drinks.coffee,
            Self::Beer => &mut place.menu_options.drinks.beer,
            Self::Wine => &mut place.menu_options.drinks.wine,
            Self::Cocktails => &mut place.menu_options.drinks.cocktails,
            Self::Restrooms => &mut place.amenities.facilities.restrooms,
            Self::Wifi => &mut place.amenities.facilities.wifi,
            Self::Parking => &mut place.amenities.facilities.parking,
            Self::WheelchairAccess => &mut place.amenities.accessibility.wheelchair_access,
            Self::AccessibleRestroom => &mut place.amenities.accessibility.accessible_restroom,
            Self::AccessibleSeating => &mut place.amenities.accessibility.accessible_seating,
        };
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalogue::{Location, NewPlace, PlaceInfo, PlaceStatus};
    use rstest::rstest;

    fn blank_place() -> Place {
        Place::create(NewPlace::new(
            "p-1",
            PlaceInfo {
                name: "Blank".to_owned(),
                place_type: Vec::new(),
                status: PlaceStatus::Operational,
            },
            Location::default(),
        ))
    }

    #[rstest]
    fn every_flag_round_trips_through_its_path() {
        for flag in OptionFlag::ALL {
            let path = flag.path();
            let mut segments = path.split('.');
            let (Some(group), Some(category), Some(name)) =
                (segments.next(), segments.next(), segments.next())
            else {
                panic!("path {path} should have three segments");
            };
            assert_eq!(OptionFlag::lookup(group, category, name), Some(flag));
        }
    }

    #[rstest]
    fn setting_one_flag_leaves_siblings_alone() {
        let mut place = blank_place();
        OptionFlag::OutdoorSeating.set(&mut place, true);
        for flag in OptionFlag::ALL {
            assert_eq!(flag.get(&place), flag == OptionFlag::OutdoorSeating);
        }
    }

    #[rstest]
    fn set_flags_appear_in_the_serialised_document() {
        let mut place = blank_place();
        OptionFlag::AccessibleSeating.set(&mut place, true);
        let value = serde_json::to_value(&place).expect("serialise place");
        assert_eq!(
            value["amenities"]["accessibility"]["accessible_seating"],
            true
        );
        assert_eq!(value["service_options"]["meals"]["brunch"], false);
    }
}
