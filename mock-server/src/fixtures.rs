//! Seed catalog served by the mock server.
//!
//! Reference URLs are built from the server's own base URL so that they pass
//! a client's trusted-origin check. Koriko's residents deliberately hold the
//! placeholder `"TODO"`, and the Flaptter has no pilot, mirroring gaps in the
//! public API.

use uuid::Uuid;

use crate::{Dataset, Film, Location, Person, Species, Vehicle};

pub mod ids {
    pub const CASTLE_IN_THE_SKY: &str = "2baf70d1-42bb-4437-b551-e5fed5a87abe";
    pub const MY_NEIGHBOR_TOTORO: &str = "58611129-2dbc-4a81-a72f-77ddfc1b1b49";
    pub const KIKIS_DELIVERY_SERVICE: &str = "ea660b10-85c4-4ae3-8a5f-41cea3648e3e";
    pub const PORCO_ROSSO: &str = "ebbb6b7c-945c-41ee-a792-de0e43191bd8";

    pub const PAZU: &str = "fe93adf2-2f3a-4ec4-9f68-5422f1b87c01";
    pub const SHEETA: &str = "598f7048-74ff-41e0-92ef-87dc1ad980a9";
    pub const MUSKA: &str = "4b76f441-ba0d-44ca-896b-fad353e368e3";
    pub const SATSUKI: &str = "ae7e07ad-e129-441f-be50-3466cefdc6d3";
    pub const MEI: &str = "92295c7c-ae0e-4aa9-98cb-9695310285d3";
    pub const TOTORO: &str = "8a6102d1-c758-484b-b7ed-79d52bd31b90";
    pub const KIKI: &str = "cb2865a5-f23b-4f16-85c5-7cce3528c923";
    pub const JIJI: &str = "cb7ab725-5f94-4a95-930c-441c700ff089";
    pub const PORCO: &str = "b96890b0-eafa-42c5-a7ff-a2edc6ef8766";

    pub const HUMAN: &str = "af3910a6-429f-4c74-9ad5-dfe1c4aa04f2";
    pub const TOTORO_SPECIES: &str = "8550ad4b-0651-4e72-a24e-6abd59ce9486";
    pub const CAT: &str = "15b665e0-948f-402a-85ef-da00866e8806";

    pub const GONDOA: &str = "3a8588c7-fe38-4c86-86c3-c095fa8cec96";
    pub const MATSUGO: &str = "6d5c7b0d-c021-45a1-b9eb-f1681b69b031";
    pub const KORIKO: &str = "a160d65f-ce31-4596-be10-916b5f209b62";

    pub const GOLIATH: &str = "b1c6af6b-fe4e-4f8a-a24b-b63fa6cd150c";
    pub const SAVOIA: &str = "273cd9f1-6e9b-4988-9b98-4de4ace57851";
    pub const FLAPTTER: &str = "46cda6a7-42ce-40a6-988f-0ca4a80d2caf";
}

struct Links<'a> {
    base: &'a str,
}

impl Links<'_> {
    fn one(&self, collection: &str, id: &str) -> String {
        format!("{}/{collection}/{id}", self.base)
    }

    fn many(&self, collection: &str, ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| self.one(collection, id)).collect()
    }
}

struct FilmSeed {
    id: &'static str,
    title: &'static str,
    original_title: &'static str,
    original_title_romanised: &'static str,
    producer: &'static str,
    release_date: &'static str,
    running_time: &'static str,
    rt_score: &'static str,
    description: &'static str,
    people: &'static [&'static str],
    species: &'static [&'static str],
    locations: &'static [&'static str],
    vehicles: &'static [&'static str],
}

impl FilmSeed {
    fn build(&self, l: &Links<'_>) -> Film {
        Film {
            id: uuid(self.id),
            title: self.title.to_string(),
            original_title: self.original_title.to_string(),
            original_title_romanised: self.original_title_romanised.to_string(),
            description: self.description.to_string(),
            director: "Hayao Miyazaki".to_string(),
            producer: self.producer.to_string(),
            release_date: self.release_date.to_string(),
            running_time: self.running_time.to_string(),
            rt_score: self.rt_score.to_string(),
            people: l.many("people", self.people),
            species: l.many("species", self.species),
            locations: l.many("locations", self.locations),
            vehicles: l.many("vehicles", self.vehicles),
            url: l.one("films", self.id),
        }
    }
}

fn uuid(id: &str) -> Uuid {
    Uuid::parse_str(id).unwrap_or_default()
}

fn text(s: &str) -> Option<String> {
    Some(s.to_string())
}

pub fn dataset(base_url: &str) -> Dataset {
    use ids::*;

    let base = base_url.trim_end_matches('/');
    let l = Links { base };

    let films = [
        FilmSeed {
            id: CASTLE_IN_THE_SKY,
            title: "Castle in the Sky",
            original_title: "天空の城ラピュタ",
            original_title_romanised: "Tenkū no shiro Rapyuta",
            producer: "Isao Takahata",
            release_date: "1986",
            running_time: "124",
            rt_score: "95",
            description: "A girl with a levitating crystal and a boy from a mining town search for a floating castle.",
            people: &[PAZU, SHEETA, MUSKA],
            species: &[HUMAN],
            locations: &[GONDOA],
            vehicles: &[GOLIATH, FLAPTTER],
        },
        FilmSeed {
            id: MY_NEIGHBOR_TOTORO,
            title: "My Neighbor Totoro",
            original_title: "となりのトトロ",
            original_title_romanised: "Tonari no Totoro",
            producer: "Hayao Miyazaki",
            release_date: "1988",
            running_time: "86",
            rt_score: "93",
            description: "Two sisters move to the countryside and befriend the forest spirits.",
            people: &[SATSUKI, MEI, TOTORO],
            species: &[HUMAN, TOTORO_SPECIES],
            locations: &[MATSUGO],
            vehicles: &[],
        },
        FilmSeed {
            id: KIKIS_DELIVERY_SERVICE,
            title: "Kiki's Delivery Service",
            original_title: "魔女の宅急便",
            original_title_romanised: "Majo no takkyūbin",
            producer: "Hayao Miyazaki",
            release_date: "1989",
            running_time: "102",
            rt_score: "96",
            description: "A young witch starts a flying delivery service in a seaside town.",
            people: &[KIKI, JIJI],
            species: &[HUMAN, CAT],
            locations: &[KORIKO],
            vehicles: &[],
        },
        FilmSeed {
            id: PORCO_ROSSO,
            title: "Porco Rosso",
            original_title: "紅の豚",
            original_title_romanised: "Kurenai no buta",
            producer: "Toshio Suzuki",
            release_date: "1992",
            running_time: "93",
            rt_score: "94",
            description: "A cursed World War I ace hunts sky pirates over the Adriatic.",
            people: &[PORCO],
            species: &[HUMAN],
            locations: &[],
            vehicles: &[SAVOIA],
        },
    ]
    .iter()
    .map(|seed| seed.build(&l))
    .collect();

    let person = |id: &str, name: &str, gender: &str, age: &str, films: &[&str], species: &str| {
        Person {
            id: uuid(id),
            name: name.to_string(),
            gender: text(gender),
            age: text(age),
            eye_color: None,
            hair_color: None,
            films: l.many("films", films),
            species: l.one("species", species),
            url: l.one("people", id),
        }
    };

    let people = vec![
        person(PAZU, "Pazu", "Male", "13", &[CASTLE_IN_THE_SKY], HUMAN),
        person(SHEETA, "Sheeta", "Female", "12", &[CASTLE_IN_THE_SKY], HUMAN),
        person(MUSKA, "Colonel Muska", "Male", "33", &[CASTLE_IN_THE_SKY], HUMAN),
        person(SATSUKI, "Satsuki Kusakabe", "Female", "11", &[MY_NEIGHBOR_TOTORO], HUMAN),
        person(MEI, "Mei Kusakabe", "Female", "4", &[MY_NEIGHBOR_TOTORO], HUMAN),
        person(TOTORO, "Totoro", "NA", "", &[MY_NEIGHBOR_TOTORO], TOTORO_SPECIES),
        person(KIKI, "Kiki", "Female", "13", &[KIKIS_DELIVERY_SERVICE], HUMAN),
        person(JIJI, "Jiji", "Male", "NA", &[KIKIS_DELIVERY_SERVICE], CAT),
        person(PORCO, "Porco Rosso", "Male", "47", &[PORCO_ROSSO], HUMAN),
    ];

    let species = vec![
        Species {
            id: uuid(HUMAN),
            name: "Human".to_string(),
            classification: text("Mammal"),
            eye_colors: text("Black, Blue, Brown, Grey, Green, Hazel"),
            hair_colors: text("Black, Blonde, Brown, Grey, White"),
            people: l.many("people", &[PAZU, SHEETA, MUSKA, SATSUKI, MEI, KIKI, PORCO]),
            films: l.many(
                "films",
                &[CASTLE_IN_THE_SKY, MY_NEIGHBOR_TOTORO, KIKIS_DELIVERY_SERVICE, PORCO_ROSSO],
            ),
            url: l.one("species", HUMAN),
        },
        Species {
            id: uuid(TOTORO_SPECIES),
            name: "Totoro".to_string(),
            classification: text("Spirit"),
            eye_colors: text("Black"),
            hair_colors: text("Grey, Brown, Blue"),
            people: l.many("people", &[TOTORO]),
            films: l.many("films", &[MY_NEIGHBOR_TOTORO]),
            url: l.one("species", TOTORO_SPECIES),
        },
        Species {
            id: uuid(CAT),
            name: "Cat".to_string(),
            classification: text("Mammal"),
            eye_colors: text("Black, Yellow"),
            hair_colors: text("Black"),
            people: l.many("people", &[JIJI]),
            films: l.many("films", &[KIKIS_DELIVERY_SERVICE]),
            url: l.one("species", CAT),
        },
    ];

    let locations = vec![
        Location {
            id: uuid(GONDOA),
            name: "Gondoa".to_string(),
            climate: text("TODO"),
            terrain: text("Mountain"),
            surface_water: text("40"),
            residents: l.many("people", &[SHEETA]),
            films: l.many("films", &[CASTLE_IN_THE_SKY]),
            url: l.one("locations", GONDOA),
        },
        Location {
            id: uuid(MATSUGO),
            name: "Matsugo".to_string(),
            climate: text("Wet"),
            terrain: text("Hill"),
            surface_water: text("30"),
            residents: l.many("people", &[SATSUKI, MEI]),
            films: l.many("films", &[MY_NEIGHBOR_TOTORO]),
            url: l.one("locations", MATSUGO),
        },
        Location {
            id: uuid(KORIKO),
            name: "Koriko".to_string(),
            climate: text("Mild"),
            terrain: text("City"),
            surface_water: text("60"),
            residents: vec!["TODO".to_string()],
            films: l.many("films", &[KIKIS_DELIVERY_SERVICE]),
            url: l.one("locations", KORIKO),
        },
    ];

    let vehicles = vec![
        Vehicle {
            id: uuid(GOLIATH),
            name: "Air Destroyer Goliath".to_string(),
            description: text("A military airship used by the government to access Laputa"),
            vehicle_class: text("Airship"),
            length: text("1,000"),
            pilot: l.one("people", MUSKA),
            films: l.many("films", &[CASTLE_IN_THE_SKY]),
            url: l.one("vehicles", GOLIATH),
        },
        Vehicle {
            id: uuid(SAVOIA),
            name: "Savoia S.21".to_string(),
            description: text("A red seaplane flown by a bounty hunter"),
            vehicle_class: text("Seaplane"),
            length: text("8"),
            pilot: l.one("people", PORCO),
            films: l.many("films", &[PORCO_ROSSO]),
            url: l.one("vehicles", SAVOIA),
        },
        Vehicle {
            id: uuid(FLAPTTER),
            name: "Flaptter".to_string(),
            description: text("An ornithopter flown by the Dola family"),
            vehicle_class: text("Ornithopter"),
            length: text("3"),
            pilot: String::new(),
            films: l.many("films", &[CASTLE_IN_THE_SKY]),
            url: l.one("vehicles", FLAPTTER),
        },
    ];

    Dataset {
        films,
        people,
        locations,
        species,
        vehicles,
    }
}
