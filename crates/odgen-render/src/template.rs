//! Fixed layout of the "Ordem do Dia" sheet.
//!
//! Rows and columns are zero-based. Sizes are given in screen pixels and
//! converted with [`width_units`] and [`row_points`].

/// Last used column (M)
pub const LAST_COL: u16 = 12;

pub const BANNER_ROW: u32 = 0;
pub const TITLE_ROW: u32 = 1;
pub const INFO_ROW: u32 = 3;
pub const HOURS_TITLE_ROW: u32 = 5;
pub const HOURS_HEADER_ROW: u32 = 6;
pub const HOURS_VALUE_ROW: u32 = 7;
pub const CREW_TITLE_ROW: u32 = 9;
pub const CREW_HEADER_ROW: u32 = 10;
pub const CREW_VALUE_ROW: u32 = 11;
pub const CAST_TITLE_ROW: u32 = 13;
pub const CAST_HEADER_ROW: u32 = 14;
pub const CAST_FIRST_ROW: u32 = 15;
/// Blank rows left for the cast to be filled in by hand
pub const CAST_BLANK_ROWS: u32 = 4;
pub const SCHEDULE_TITLE_ROW: u32 = CAST_FIRST_ROW + CAST_BLANK_ROWS + 1;
pub const SCHEDULE_HEADER_ROW: u32 = SCHEDULE_TITLE_ROW + 1;
pub const SCHEDULE_FIRST_ROW: u32 = SCHEDULE_HEADER_ROW + 1;

/// Column spans of the 8-slot bands (general hours, crew call, cast)
pub const SLOT_SPANS: [(u16, u16); 8] = [
    (0, 0),
    (1, 2),
    (3, 4),
    (5, 5),
    (6, 6),
    (7, 8),
    (9, 10),
    (11, 12),
];

/// Column widths in pixels, A through M
pub const COLUMN_WIDTHS_PX: [f64; 13] = [
    240.0, 150.0, 156.0, 146.0, 212.0, 346.0, 238.0, 198.0, 204.0, 208.0, 262.0, 256.0, 233.0,
];

pub const BANNER_HEIGHT_PX: f64 = 40.0;
pub const TITLE_HEIGHT_PX: f64 = 242.0;
pub const INFO_HEIGHT_PX: f64 = 172.0;
pub const SHOT_ROW_HEIGHT_PX: f64 = 212.0;

/// Excel column width units for a pixel width
pub fn width_units(px: f64) -> f64 {
    px / 7.0
}

/// Row height in points for a pixel height
pub fn row_points(px: f64) -> f64 {
    px * 0.75
}

pub const OBSERVATIONS: &str = "OBSERVAÇÕES GERAIS: O silêncio absoluto é primordial! CELULARES EM MODO AVIÃO\n\
Repudiamos a prática de qualquer ato que resulte em discriminação, constrangimento moral ou \
assédio de qualquer natureza, sobretudo sexual, adotando, desta forma a política de tolerância \
zero para estes tipos de conduta. Esta política de tolerância zero tem aplicação em qualquer \
ambiente de trabalho, interno ou externo";

pub const ADDRESS: &str =
    "Endereço base/SET/LOCAÇÃO\nR. Vaz Caminha, 481 - Zona 02, Maringá - PR";

pub const HOURS_TITLE: &str = "HORÁRIOS GERAIS";
pub const HOURS_HEADERS: [&str; 8] = [
    "CHAMADA",
    "PREPARAÇÃO",
    "REC CENA 1",
    "ALMOÇO",
    "PREPARAÇÃO",
    "REC CENA",
    "DESPRODUÇÃO",
    "FIM DA DIÁRIA",
];
pub const DEFAULT_HOURS: [&str; 8] = [
    "07h00", "07h30", "09h30", "12h00", "13h00", "14h30", "16h00", "17h00",
];
/// Fewer timed activities than this and the default hours are shown
pub const MIN_PARSED_HOURS: usize = 4;

pub const CREW_TITLE: &str = "CHAMADA EQUIPE";
pub const CREW_HEADERS: [&str; 8] = [
    "PRODUÇÃO",
    "DIREÇÃO",
    "ARTE",
    "FOTOGRAFIA",
    "ASSIST. CÂMERA",
    "GAFFER e ELÉTRICA",
    "SOM",
    "FIGURINO",
];
pub const CREW_CALLS: [&str; 8] = [
    "A/O", "07h00", "07h00", "07h00", "07h00", "07h00", "07h30", "07h30",
];

pub const CAST_TITLE: &str = "ELENCO";
pub const CAST_HEADERS: [&str; 8] = [
    "ID",
    "ELENCO",
    "PERSONAGEM",
    "CENAS",
    "CHEGADA",
    "CAMARIM",
    "NO SET",
    "SAÍDA",
];

pub const SCHEDULE_TITLE: &str = "CRONOGRAMA DO DIA";
/// Header cells of the chronological table; DESCRIÇÃO spans C:E
pub const SCHEDULE_HEADERS: [(&str, u16, u16); 11] = [
    ("HORA A HORA", 0, 0),
    ("CENA", 1, 1),
    ("DESCRIÇÃO", 2, 4),
    ("SHOOTING BOARD", 5, 5),
    ("PLANOS", 6, 6),
    ("ELENCO", 7, 7),
    ("SET", 8, 8),
    ("FIGURINO", 9, 9),
    ("ARTE", 10, 10),
    ("MICROFONAGEM", 11, 11),
    ("CRONOLOGIA", 12, 12),
];

pub mod col {
    pub const HOUR: u16 = 0;
    pub const SCENE: u16 = 1;
    pub const DESCRIPTION: u16 = 2;
    pub const DESCRIPTION_END: u16 = 4;
    pub const SHOOTING_BOARD: u16 = 5;
    pub const SHOTS: u16 = 6;
    pub const CAST: u16 = 7;
    pub const SET: u16 = 8;
    pub const WARDROBE: u16 = 9;
    pub const ART: u16 = 10;
    pub const MIC: u16 = 11;
    pub const CONTINUITY: u16 = 12;
}

/// Fill colors
pub mod fill {
    pub const DARK: u32 = 0x3F3F3F;
    pub const LIGHT: u32 = 0xD8D8D8;
    pub const SCENE: u32 = 0xFFFFFF;
    pub const REC: u32 = 0xFFF3E0;
}
