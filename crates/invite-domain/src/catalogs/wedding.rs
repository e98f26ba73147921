//! Field catalog for wedding invitations.

use indexmap::IndexMap;

use crate::{
    catalog::{CatalogBuilder, CatalogError, FieldCatalog, PropAccessor, PropRule, SlotSpec},
    field::{FieldDefinition, InputKind},
    section::SectionDefinition,
};

pub const DOMAIN: &str = "wedding";

/// Number of fixed "moment" slots in the story section.
pub const MOMENT_SLOTS: u32 = 4;
/// Number of fixed featured-photo slots in the gallery section.
pub const FEATURED_PHOTO_SLOTS: u32 = 3;

const BASIC_FIELDS: &[&str] = &[
    "groomName",
    "brideName",
    "weddingDate",
    "heroImage",
    "welcomeMessage",
    "moment1Title",
    "moment1Date",
    "galleryImages",
    "ceremonyVenue",
    "ceremonyTime",
    "receptionVenue",
    "receptionTime",
    "rsvpDeadline",
    "rsvpPhone",
    "footerMessage",
];

pub fn catalog() -> Result<FieldCatalog, CatalogError> {
    let builder = sections(FieldCatalog::builder(DOMAIN));
    let builder = couple_fields(builder);
    let builder = story_fields(builder);
    let builder = gallery_fields(builder);
    let builder = event_fields(builder);
    let builder = closing_fields(builder);
    builder
        .basic(BASIC_FIELDS.iter().copied())
        .build()
}

fn sections(builder: CatalogBuilder) -> CatalogBuilder {
    [
        ("hero", "Portada", "heart"),
        ("welcome", "Bienvenida", "hand-wave"),
        ("countdown", "Cuenta regresiva", "hourglass"),
        ("story", "Nuestra historia", "book-open"),
        ("gallery", "Galería", "images"),
        ("ceremony", "Ceremonia", "church"),
        ("reception", "Recepción", "glass"),
        ("dressCode", "Código de vestimenta", "shirt"),
        ("rsvp", "Confirmación", "mail"),
        ("footer", "Cierre", "flag"),
    ]
    .into_iter()
    .fold(builder, |builder, (name, label, icon)| {
        builder.section(SectionDefinition::new(name, label, icon))
    })
}

fn couple_fields(builder: CatalogBuilder) -> CatalogBuilder {
    builder
        .field(
            FieldDefinition::new(
                "groomName",
                "Nombre del novio",
                InputKind::ShortText,
                ["hero", "footer"],
                "couple",
            )
            .with_placeholder("Nombre del novio"),
        )
        .field(
            FieldDefinition::new(
                "brideName",
                "Nombre de la novia",
                InputKind::ShortText,
                ["hero", "footer"],
                "couple",
            )
            .with_placeholder("Nombre de la novia"),
        )
        .field(FieldDefinition::new(
            "weddingDate",
            "Fecha de la boda",
            InputKind::DateTime,
            ["hero", "countdown"],
            "dates",
        ))
        .default_source("weddingDate", PropAccessor::new("hero", "/date"))
        .default_source("weddingDate", PropAccessor::new("countdown", "/targetDate"))
        .field(FieldDefinition::new(
            "heroImage",
            "Imagen de portada",
            InputKind::Url,
            "hero",
            "media",
        ))
        .field(
            FieldDefinition::new(
                "heroSubtitle",
                "Frase de portada",
                InputKind::ShortText,
                "hero",
                "messages",
            )
            .with_placeholder("¡Nos casamos!"),
        )
        .rule(
            "hero",
            PropRule::Join {
                prop: "coupleDisplayName".into(),
                fields: vec!["groomName".into(), "brideName".into()],
                separator: " & ".into(),
            },
        )
        .field(
            FieldDefinition::new(
                "welcomeTitle",
                "Título de bienvenida",
                InputKind::ShortText,
                "welcome",
                "messages",
            )
            .with_placeholder("Bienvenidos"),
        )
        .field(FieldDefinition::new(
            "welcomeMessage",
            "Mensaje de bienvenida",
            InputKind::LongText,
            "welcome",
            "messages",
        ))
        .field(FieldDefinition::new(
            "countdownTitle",
            "Título de la cuenta regresiva",
            InputKind::ShortText,
            "countdown",
            "messages",
        ))
        .rule(
            "countdown",
            PropRule::Copy {
                prop: "targetDate".into(),
                field: "weddingDate".into(),
            },
        )
}

fn story_fields(builder: CatalogBuilder) -> CatalogBuilder {
    let builder = builder.field(
        FieldDefinition::new(
            "storyTitle",
            "Título de la historia",
            InputKind::ShortText,
            "story",
            "story",
        )
        .with_placeholder("Nuestra historia"),
    );

    let mut slots = Vec::new();
    let mut builder = builder;
    for slot in 1..=MOMENT_SLOTS {
        let index = slot - 1;
        let parts = [
            ("date", "Date", "Fecha", InputKind::Date),
            ("title", "Title", "Título", InputKind::ShortText),
            ("description", "Description", "Descripción", InputKind::LongText),
            ("image", "Image", "Imagen", InputKind::Url),
        ];
        let mut fields = IndexMap::new();
        for (prop, suffix, label, kind) in parts {
            let key = format!("moment{slot}{suffix}");
            builder = builder
                .field(FieldDefinition::new(
                    key.clone(),
                    format!("Momento {slot}: {label}"),
                    kind,
                    "story",
                    "story",
                ))
                .default_source(
                    key.clone(),
                    PropAccessor::new("story", format!("/moments/{index}/{prop}")),
                );
            fields.insert(prop.to_string(), key);
        }
        slots.push(SlotSpec { slot, fields });
    }

    builder.rule(
        "story",
        PropRule::Slots {
            prop: "moments".into(),
            primary: "title".into(),
            slots,
        },
    )
}

fn gallery_fields(builder: CatalogBuilder) -> CatalogBuilder {
    let mut builder = builder
        .field(
            FieldDefinition::new(
                "galleryTitle",
                "Título de la galería",
                InputKind::ShortText,
                "gallery",
                "gallery",
            )
            .with_placeholder("Galería"),
        )
        .field(FieldDefinition::new(
            "galleryImages",
            "Fotos",
            InputKind::MultiImage,
            "gallery",
            "gallery",
        ))
        .default_source("galleryImages", PropAccessor::new("gallery", "/images"));

    let mut slots = Vec::new();
    for slot in 1..=FEATURED_PHOTO_SLOTS {
        let index = slot - 1;
        let url_key = format!("featuredPhoto{slot}Url");
        let caption_key = format!("featuredPhoto{slot}Caption");
        builder = builder
            .field(FieldDefinition::new(
                url_key.clone(),
                format!("Foto destacada {slot}"),
                InputKind::Url,
                "gallery",
                "gallery",
            ))
            .default_source(
                url_key.clone(),
                PropAccessor::new("gallery", format!("/featured/{index}/url")),
            )
            .field(FieldDefinition::new(
                caption_key.clone(),
                format!("Foto destacada {slot}: pie de foto"),
                InputKind::ShortText,
                "gallery",
                "gallery",
            ))
            .default_source(
                caption_key.clone(),
                PropAccessor::new("gallery", format!("/featured/{index}/caption")),
            );
        let mut fields = IndexMap::new();
        fields.insert("url".to_string(), url_key);
        fields.insert("caption".to_string(), caption_key);
        slots.push(SlotSpec { slot, fields });
    }

    builder.rule(
        "gallery",
        PropRule::Slots {
            prop: "featured".into(),
            primary: "url".into(),
            slots,
        },
    )
}

fn event_fields(builder: CatalogBuilder) -> CatalogBuilder {
    let mut builder = builder;
    for (section, label) in [("ceremony", "la ceremonia"), ("reception", "la recepción")] {
        let parts = [
            ("Venue", "Lugar de", InputKind::ShortText),
            ("Address", "Dirección de", InputKind::LongText),
            ("Time", "Hora de", InputKind::Time),
            ("MapUrl", "Mapa de", InputKind::Url),
        ];
        for (suffix, prefix, kind) in parts {
            let key = format!("{section}{suffix}");
            builder = builder.field(FieldDefinition::new(
                key,
                format!("{prefix} {label}"),
                kind,
                section,
                "events",
            ));
        }
    }
    builder
        .field(FieldDefinition::new(
            "dressCodeTitle",
            "Título del código de vestimenta",
            InputKind::ShortText,
            "dressCode",
            "style",
        ))
        .field(FieldDefinition::new(
            "dressCodeDescription",
            "Descripción del código de vestimenta",
            InputKind::LongText,
            "dressCode",
            "style",
        ))
        .field(FieldDefinition::new(
            "dressCodeColor",
            "Color sugerido",
            InputKind::Color,
            "dressCode",
            "style",
        ))
}

fn closing_fields(builder: CatalogBuilder) -> CatalogBuilder {
    builder
        .field(
            FieldDefinition::new(
                "rsvpTitle",
                "Título de confirmación",
                InputKind::ShortText,
                "rsvp",
                "rsvp",
            )
            .with_placeholder("Confirma tu asistencia"),
        )
        .field(FieldDefinition::new(
            "rsvpEnabled",
            "Mostrar formulario",
            InputKind::BooleanToggle,
            "rsvp",
            "rsvp",
        ))
        .field(FieldDefinition::new(
            "rsvpDeadline",
            "Fecha límite",
            InputKind::Date,
            "rsvp",
            "rsvp",
        ))
        .field(FieldDefinition::new(
            "rsvpPhone",
            "Teléfono de contacto",
            InputKind::ShortText,
            "rsvp",
            "rsvp",
        ))
        .field(FieldDefinition::new(
            "rsvpMessage",
            "Mensaje de confirmación",
            InputKind::LongText,
            "rsvp",
            "rsvp",
        ))
        .field(FieldDefinition::new(
            "footerMessage",
            "Mensaje de despedida",
            InputKind::LongText,
            "footer",
            "messages",
        ))
        .field(FieldDefinition::new(
            "hashtag",
            "Hashtag",
            InputKind::ShortText,
            "footer",
            "messages",
        ))
        .rule(
            "footer",
            PropRule::Join {
                prop: "coupleDisplayName".into(),
                fields: vec!["groomName".into(), "brideName".into()],
                separator: " & ".into(),
            },
        )
}
