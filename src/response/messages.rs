//! Localized message catalog
//!
//! Messages are looked up by (locale, action, outcome) and templated with the
//! entity name. Templates use the `:Entity` placeholder, plus `:count` for
//! messages reporting a record count.

use serde::{Deserialize, Serialize};

use crate::response::Action;

/// Supported catalog locales
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
    Pt,
}

/// Generic HTTP-layer messages, outside the CRUD catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMessage {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    UnprocessableEntity,
    InternalServerError,
}

/// Success message for a CRUD action, with the entity name substituted
pub fn success(locale: Locale, action: Action, entity: &str) -> String {
    let template = match (locale, action) {
        (Locale::En, Action::Index) => ":Entity successfully listed",
        (Locale::En, Action::Store) => ":Entity successfully created",
        (Locale::En, Action::Show) => ":Entity successfully shown",
        (Locale::En, Action::Update) => ":Entity successfully updated",
        (Locale::En, Action::Destroy) => ":Entity successfully deleted",

        (Locale::Fr, Action::Index) => "Tous les enregistrements récupérés",
        (Locale::Fr, Action::Store) => ":Entity créée avec succès",
        (Locale::Fr, Action::Show) => ":Entity affichée avec succès",
        (Locale::Fr, Action::Update) => ":Entity mise à jour avec succès",
        (Locale::Fr, Action::Destroy) => ":Entity supprimée avec succès",

        (Locale::Pt, Action::Index) => ":Entity listada com sucesso",
        (Locale::Pt, Action::Store) => ":Entity criada com sucesso",
        (Locale::Pt, Action::Show) => ":Entity mostrada com sucesso",
        (Locale::Pt, Action::Update) => ":Entity actualizada com sucesso",
        (Locale::Pt, Action::Destroy) => ":Entity eliminada com sucesso",
    };

    substitute(template, entity)
}

/// Failure message for a CRUD action, with the entity name substituted
pub fn error(locale: Locale, action: Action, entity: &str) -> String {
    let template = match (locale, action) {
        (Locale::En, Action::Index) => "Error listing :Entity",
        (Locale::En, Action::Store) => "Error creating :Entity",
        (Locale::En, Action::Show) => "Error showing :Entity",
        (Locale::En, Action::Update) => "Error updating :Entity",
        (Locale::En, Action::Destroy) => "Error deleting :Entity",

        (Locale::Fr, Action::Index) => "Erreur de référencement :Entity",
        (Locale::Fr, Action::Store) => "Erreur création :Entity",
        (Locale::Fr, Action::Show) => "Erreur affichage :Entity",
        (Locale::Fr, Action::Update) => "Erreur mise à jour :Entity",
        (Locale::Fr, Action::Destroy) => "Erreur suppression :Entity",

        (Locale::Pt, Action::Index) => "Erro ao listar :Entity",
        (Locale::Pt, Action::Store) => "Erro ao criar :Entity",
        (Locale::Pt, Action::Show) => "Erro ao mostrar :Entity",
        (Locale::Pt, Action::Update) => "Erro ao actualizar :Entity",
        (Locale::Pt, Action::Destroy) => "Erro ao eliminar :Entity",
    };

    substitute(template, entity)
}

/// ":Entity not found" message
pub fn not_found(locale: Locale, entity: &str) -> String {
    let template = match locale {
        Locale::En => ":Entity not found",
        Locale::Fr => ":Entity non trouvée",
        Locale::Pt => ":Entity não encontrado",
    };

    substitute(template, entity)
}

/// Message attached to validation failures
pub fn validation_failed(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Validation failed",
        Locale::Fr => "Validation échouée",
        Locale::Pt => "Validação falhou",
    }
}

/// Generic HTTP-layer message
pub fn api(locale: Locale, message: ApiMessage) -> &'static str {
    match (locale, message) {
        (Locale::En, ApiMessage::BadRequest) => "Bad request.",
        (Locale::En, ApiMessage::Unauthorized) => "Not authenticated.",
        (Locale::En, ApiMessage::Forbidden) => "Not authorized on this action.",
        (Locale::En, ApiMessage::NotFound) => {
            "URL/resource not found, or using wrong HTTP verb."
        }
        (Locale::En, ApiMessage::UnprocessableEntity) => "Request validation failed.",
        (Locale::En, ApiMessage::InternalServerError) => "An internal server error occurred.",

        (Locale::Fr, ApiMessage::BadRequest) => "Mauvaise demande.",
        (Locale::Fr, ApiMessage::Unauthorized) => "Non authentifié.",
        (Locale::Fr, ApiMessage::Forbidden) => "Non autorisé sur cette action.",
        (Locale::Fr, ApiMessage::NotFound) => {
            "URL / ressource introuvable ou utilisant un verbe HTTP incorrect."
        }
        (Locale::Fr, ApiMessage::UnprocessableEntity) => {
            "Échec de la validation de la demande."
        }
        (Locale::Fr, ApiMessage::InternalServerError) => {
            "Une erreur de serveur interne s'est produite."
        }

        (Locale::Pt, ApiMessage::BadRequest) => "Pedido incorrecto.",
        (Locale::Pt, ApiMessage::Unauthorized) => "Não autenticado.",
        (Locale::Pt, ApiMessage::Forbidden) => "Não autorizado nesta acção.",
        (Locale::Pt, ApiMessage::NotFound) => {
            "URL/recurso não encontrado, ou verbo HTTP incorrecto."
        }
        (Locale::Pt, ApiMessage::UnprocessableEntity) => "Validação do pedido falhou.",
        (Locale::Pt, ApiMessage::InternalServerError) => {
            "Aconteceu um erro interno no servidor."
        }
    }
}

/// Replace the `:Entity` placeholder
pub fn substitute(template: &str, entity: &str) -> String {
    template.replace(":Entity", entity)
}

/// Replace the `:Entity` and `:count` placeholders
pub fn substitute_count(template: &str, entity: &str, count: u64) -> String {
    substitute(template, entity).replace(":count", &count.to_string())
}
