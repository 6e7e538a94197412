/*
 * Copyright 2025 Carver Automation Corporation.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Sheet and column labels of the inventory workbook.
//!
//! The labels are matched exactly (after trimming the header cell).

/// Sheet names.
pub mod sheets {
    pub const ASSETS: &str = "Assets";
    pub const USERS: &str = "Usuarios";
    pub const INTERFACES: &str = "Interfaces";
    pub const IPS: &str = "IPs";
    pub const CPES: &str = "CPEs";
    pub const PROPERTIES: &str = "Propiedades";
    pub const HOSTNAMES: &str = "HostNames";
}

/// Foreign key present on every child sheet except `IPs`.
pub const ASSET_KEY: &str = "Nombre único de Asset";

/// `Assets` sheet.
pub mod asset {
    pub const UNIQUE_NAME: &str = "Nombre único";
    pub const EXPOSURE_LEVEL: &str = "Nivel de exposición";
    pub const SAFETY: &str = "Safety";
    pub const ZONE: &str = "Zona";
    pub const NAME: &str = "Nombre";
    pub const ALIAS: &str = "Alias";
    pub const DESCRIPTION: &str = "Descripción";
    pub const TYPE: &str = "Tipo";
    pub const STATUS: &str = "Estado";
    pub const VALUE: &str = "Valor económico";
    pub const ACQUIRED: &str = "Fecha adquisición";
    pub const LOCATION: &str = "Localización";
    pub const ADDITIONAL_INFO: &str = "Información adicional";
    pub const OWNER: &str = "Propietario";
    pub const OWNER_CONTACT: &str = "Contacto del propietario";
    pub const BUSINESS_OWNER: &str = "Propietario (negocio)";
    pub const BUSINESS_OWNER_CONTACT: &str = "Contacto del propietario (negocio)";
    pub const TECH_OWNER: &str = "Propietario (Técnico)";
    pub const TECH_OWNER_CONTACT: &str = "Contacto del propietario (Técnico)";
}

/// `Usuarios` sheet.
pub mod user {
    pub const USERNAME: &str = "Usuario";
    pub const FIRST_SEEN: &str = "Primera detección";
    pub const LAST_SEEN: &str = "Última detección";
}

/// `Interfaces` and `IPs` sheets.
pub mod interface {
    pub const MAC: &str = "Dirección MAC";
    pub const IP: &str = "Dirección IP";
}

/// `CPEs` sheet.
pub mod cpe {
    pub const CPE: &str = "CPE";
}

/// `Propiedades` / `HostNames` sheets.
pub mod property {
    pub const NAME: &str = "Propiedad";
    pub const VALUE: &str = "Valor";
    pub const HOSTNAME: &str = "HostName";
}
