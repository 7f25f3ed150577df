//! Site content. Kept in code: the site is small and changes with releases.

pub struct Song {
    pub title: &'static str,
    pub artist: &'static str,
}

pub struct Playlist {
    pub name: &'static str,
    pub mood: &'static str,
    pub songs: &'static [Song],
}

pub struct DiaryEntry {
    pub slug: &'static str,
    pub date: &'static str,
    pub title: &'static str,
    /// Markdown.
    pub body: &'static str,
}

pub const PLAYLISTS: &[Playlist] = &[
    Playlist {
        name: "Domingos lentos",
        mood: "Para desayunar sin prisa",
        songs: &[
            Song {
                title: "Bésame mucho",
                artist: "Consuelo Velázquez",
            },
            Song {
                title: "La vie en rose",
                artist: "Édith Piaf",
            },
            Song {
                title: "Something",
                artist: "The Beatles",
            },
        ],
    },
    Playlist {
        name: "Carretera",
        mood: "Ventanas abajo",
        songs: &[
            Song {
                title: "Here Comes the Sun",
                artist: "The Beatles",
            },
            Song {
                title: "Eres",
                artist: "Café Tacvba",
            },
        ],
    },
];

pub const DIARY: &[DiaryEntry] = &[
    DiaryEntry {
        slug: "primer-cafe",
        date: "2023-02-14",
        title: "El primer café",
        body: "Llegaste tarde y con el pelo mojado.\n\nPedimos *dos cafés* y nos quedamos **tres horas**.",
    },
    DiaryEntry {
        slug: "la-playa",
        date: "2023-08-05",
        title: "La playa",
        body: "Arena en todos lados.\n\n- un atardecer\n- una promesa\n- demasiado bloqueador",
    },
];

pub const PROPOSAL_QUESTION: &str = "¿Te casas conmigo?";

pub fn diary_entry(slug: &str) -> Option<&'static DiaryEntry> {
    DIARY.iter().find(|entry| entry.slug == slug)
}
