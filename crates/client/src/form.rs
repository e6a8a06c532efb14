use std::fmt;

use storefront_core::domain::product::{NewProduct, PriceInput, Product, ProductInput};

/// Editor contents, kept as typed text until submit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub image: String,
    pub category: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub name: Option<&'static str>,
    pub price: Option<&'static str>,
    pub image: Option<&'static str>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.image.is_none()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> =
            [self.name, self.price, self.image].into_iter().flatten().collect();
        f.write_str(&messages.join("; "))
    }
}

impl ProductForm {
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.amount().to_string(),
            image: product.image.clone(),
            category: product.category.clone().unwrap_or_default(),
        }
    }

    /// Checks the form with the same rules the service applies to a new product.
    pub fn validate(&self) -> Result<ProductInput, FormErrors> {
        let input = ProductInput {
            name: Some(self.name.clone()),
            price: Some(PriceInput::Text(self.price.clone())),
            image: Some(self.image.clone()),
            category: Some(self.category.clone()),
        };

        match NewProduct::try_from(input.clone()) {
            Ok(_) => Ok(input),
            Err(validation) => {
                let mut errors = FormErrors::default();
                for field in validation.fields {
                    match (field.field, field.message) {
                        ("name", _) => errors.name = Some("Product name is required"),
                        ("price", "price is required") => errors.price = Some("Price is required"),
                        ("price", _) => errors.price = Some("Price must be a positive number"),
                        ("image", _) => errors.image = Some("Image URL is required"),
                        _ => {}
                    }
                }
                Err(errors)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use storefront_core::domain::product::{NewProduct, Price, PriceInput, Product};

    use super::ProductForm;

    fn filled() -> ProductForm {
        ProductForm {
            name: "Widget".to_string(),
            price: "9.99".to_string(),
            image: "http://x/y.png".to_string(),
            category: String::new(),
        }
    }

    #[test]
    fn valid_form_produces_input() {
        let input = filled().validate().expect("valid form");

        assert_eq!(input.name.as_deref(), Some("Widget"));
        assert_eq!(input.price, Some(PriceInput::Text("9.99".to_string())));
    }

    #[test]
    fn empty_form_reports_every_field() {
        let errors = ProductForm::default().validate().expect_err("empty form");

        assert_eq!(errors.name, Some("Product name is required"));
        assert_eq!(errors.price, Some("Price is required"));
        assert_eq!(errors.image, Some("Image URL is required"));
        assert_eq!(
            errors.to_string(),
            "Product name is required; Price is required; Image URL is required"
        );
    }

    #[test]
    fn non_positive_price_is_rejected() {
        for price in ["0", "-3", "abc"] {
            let form = ProductForm { price: price.to_string(), ..filled() };
            let errors = form.validate().expect_err("bad price");

            assert_eq!(errors.price, Some("Price must be a positive number"), "price `{price}`");
            assert_eq!(errors.name, None);
        }
    }

    #[test]
    fn prefill_round_trips_an_existing_product() {
        let product = Product::create(
            NewProduct {
                name: "Lamp".to_string(),
                price: Price::new(Decimal::new(125, 1)).expect("positive"),
                image: "http://x/lamp.png".to_string(),
                category: Some("Home".to_string()),
            },
            Utc::now(),
        );

        let form = ProductForm::from_product(&product);

        assert_eq!(form.price, "12.5");
        assert_eq!(form.category, "Home");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn renaming_keeps_sub_cent_price() {
        let product = Product::create(
            NewProduct {
                name: "Cable".to_string(),
                price: Price::new(Decimal::new(1999, 3)).expect("positive"),
                image: "http://x/cable.png".to_string(),
                category: None,
            },
            Utc::now(),
        );

        let form =
            ProductForm { name: "Braided Cable".to_string(), ..ProductForm::from_product(&product) };
        let input = form.validate().expect("valid form");
        let resubmitted = NewProduct::try_from(input).expect("valid product");

        assert_eq!(resubmitted.price.amount(), Decimal::new(1999, 3));
        assert_eq!(resubmitted.name, "Braided Cable");
    }
}
