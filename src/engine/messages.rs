// ==========================================
// 管材采购决策 - 决策说明文本
// ==========================================
// 对外展示文本保持采购部门现行措辞（法语）
// ==========================================

use crate::config::ContactDirectory;
use crate::domain::contract::PriceReference;
use crate::domain::types::RequiredField;

/// 厂家交期说明（卷盘）
pub const TOURET_LEAD_TIME_NOTE: &str =
    "Délai de fabrication 4-6 semaines sur produit hors stock";

/// 厂家交期说明
pub const FACTORY_LEAD_TIME_NOTE: &str =
    "Délai de fabrication de 4 à 6 semaines sur produit hors stock";

/// 合同价库存说明
pub const CONTRACT_STOCK_NOTE: &str =
    "Supposé en stock, Expédition sous 72H, faire valider le délai par fournisseur";

pub fn missing_field(field: RequiredField) -> String {
    match field {
        RequiredField::Material => "Please select a material.".to_string(),
        RequiredField::Package => "Please select a package.".to_string(),
        RequiredField::Quantity => "Please enter quantity.".to_string(),
        RequiredField::OuterDiameter => "Please enter DE (Diamètre Extérieur).".to_string(),
        RequiredField::NominalPressure => "Please enter PN (Pression Nominale).".to_string(),
    }
}

pub fn touret_found(reference: &PriceReference, contacts: &ContactDirectory) -> String {
    format!(
        "Supplier: {}, Price: {:.2} €/ml\nDécision: Consultation {} pour confirmer: {}",
        reference.supplier, reference.price, contacts.factory_contact, TOURET_LEAD_TIME_NOTE
    )
}

pub fn touret_not_found(contacts: &ContactDirectory) -> String {
    format!(
        "Pas de prix pour touret trouvé, contacter {}",
        contacts.category_manager
    )
}

pub fn factory(references: &[PriceReference], contacts: &ContactDirectory) -> String {
    let mut text = format!(
        "Décision: Consultation Fabricant sous contrat ({})\n",
        contacts.factory_partners.join(", ")
    );

    if references.is_empty() {
        text.push_str(&format!(
            "\n(Pas de prix contractuel pour référence, contacter {})",
            contacts.category_manager
        ));
        return text;
    }

    text.push_str("\nPrix contractuel (pour référence):\n");
    for (i, reference) in references.iter().enumerate() {
        text.push_str(&format!(
            "- Supplier {}: {}, Price: {:.2} €/ml\n",
            i + 1,
            reference.supplier,
            reference.price
        ));
    }
    text.push_str(&format!(
        "\n{}: {}",
        contacts.factory_contact, FACTORY_LEAD_TIME_NOTE
    ));
    text
}

pub fn distributor(contacts: &ContactDirectory) -> String {
    format!("Décision: Consultation {}", contacts.distribution_desk)
}

pub fn contract(references: &[PriceReference], contacts: &ContactDirectory) -> String {
    let mut text = "Décision: Application tarif contractuel\n".to_string();
    for (i, reference) in references.iter().enumerate() {
        let rank = i + 1;
        text.push_str(&format!(
            "Supplier top{}: {}, Price top{}: {:.2} €/ml\n",
            rank, reference.supplier, rank, reference.price
        ));
    }
    text.push_str(&format!("{} : {}", contacts.factory_contact, CONTRACT_STOCK_NOTE));
    text
}

pub fn contact_category_manager(contacts: &ContactDirectory) -> String {
    format!("Décision: Contact {}", contacts.category_manager)
}

pub fn manual_analysis(contacts: &ContactDirectory) -> String {
    format!(
        "Décision: Aucune règle applicable, analyse manuelle par {}",
        contacts.category_manager
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs() -> Vec<PriceReference> {
        vec![
            PriceReference {
                supplier: "Centraltubi".to_string(),
                price: 9.5,
            },
            PriceReference {
                supplier: "Elydan".to_string(),
                price: 12.0,
            },
        ]
    }

    #[test]
    fn test_factory_message_with_references() {
        let text = factory(&refs(), &ContactDirectory::default());
        assert!(text.contains("Elydan, Centraltubi"));
        assert!(text.contains("- Supplier 1: Centraltubi, Price: 9.50 €/ml"));
        assert!(text.contains("- Supplier 2: Elydan, Price: 12.00 €/ml"));
        assert!(text.ends_with(FACTORY_LEAD_TIME_NOTE));
    }

    #[test]
    fn test_factory_message_without_references() {
        let text = factory(&[], &ContactDirectory::default());
        assert!(text.contains("Pas de prix contractuel"));
        assert!(!text.contains(FACTORY_LEAD_TIME_NOTE));
    }

    #[test]
    fn test_contract_message() {
        let text = contract(&refs(), &ContactDirectory::default());
        assert!(text.contains("Supplier top1: Centraltubi, Price top1: 9.50 €/ml"));
        assert!(text.contains("72H"));
    }

    #[test]
    fn test_touret_message_names_contact() {
        let contacts = ContactDirectory {
            factory_contact: "Usine Nord".to_string(),
            ..ContactDirectory::default()
        };
        let text = touret_found(&refs()[0], &contacts);
        assert!(text.contains("Usine Nord"));
        assert!(text.contains("4-6 semaines"));
    }
}
